/// Fixed-step simulation clock.
///
/// The render loop runs as fast as the terminal allows; the simulation runs
/// at a constant tick rate. Each frame feeds its real elapsed time into the
/// accumulator and the clock answers how many whole ticks are owed, keeping
/// the remainder. A render stall therefore produces catch-up ticks rather
/// than lost simulation time.

use std::time::Duration;

pub struct SimClock {
    step: Duration,
    acc: Duration,
}

impl SimClock {
    pub fn new(step: Duration) -> Self {
        SimClock {
            step,
            acc: Duration::ZERO,
        }
    }

    /// Feed one frame's delta; returns the number of ticks now owed.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.acc += delta;
        let mut ticks = 0;
        while self.acc >= self.step {
            self.acc -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Drop any banked time. Issued when leaving the Playing screen so a
    /// pause never replays as a burst of ticks on resume.
    pub fn reset(&mut self) {
        self.acc = Duration::ZERO;
    }
}
