/// Input arbitration: one queued heading per poll, from two sources.
///
/// The analog stick wins whenever either axis clears the deadzone; the
/// digital snapshot (keyboard arrows/WASD merged with the d-pad) is the
/// fallback. A reversal guard drops any candidate that is the exact
/// negation of the snake's committed heading; a dropped candidate leaves
/// the previously queued heading untouched. The queue is consumed only at
/// tick time, so input sampling stays decoupled from the tick rate.

use crate::domain::grid::Direction;

/// Held directional keys, keyboard and d-pad merged by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeySnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Analog reading, both axes in [-1, 1]. +y is down (screen coordinates);
/// the gamepad layer converts from device conventions.
#[derive(Clone, Copy, Debug)]
pub struct StickSnapshot {
    pub x: f32,
    pub y: f32,
}

impl StickSnapshot {
    pub fn neutral(&self, deadzone: f32) -> bool {
        self.x.abs() < deadzone && self.y.abs() < deadzone
    }
}

/// Map the two sources to a directional intent, analog first.
/// Fixed priorities: on an exact analog magnitude tie the x axis wins;
/// among held keys the order is Up, Down, Left, Right.
pub fn direction_intent(
    keys: &KeySnapshot,
    stick: Option<StickSnapshot>,
    deadzone: f32,
) -> Option<Direction> {
    if let Some(s) = stick {
        if !s.neutral(deadzone) {
            return Some(if s.x.abs() >= s.y.abs() {
                if s.x > 0.0 {
                    Direction::Right
                } else {
                    Direction::Left
                }
            } else if s.y > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            });
        }
    }
    if keys.up {
        Some(Direction::Up)
    } else if keys.down {
        Some(Direction::Down)
    } else if keys.left {
        Some(Direction::Left)
    } else if keys.right {
        Some(Direction::Right)
    } else {
        None
    }
}

pub struct InputArbiter {
    deadzone: f32,
    queued: Direction,
}

impl InputArbiter {
    pub fn new(deadzone: f32) -> Self {
        InputArbiter {
            deadzone,
            queued: Direction::Right,
        }
    }

    /// Re-align with the world at round start.
    pub fn reset(&mut self, heading: Direction) {
        self.queued = heading;
    }

    /// The heading the next tick will adopt.
    pub fn queued(&self) -> Direction {
        self.queued
    }

    /// Sample once per render frame. `current` is the snake's committed
    /// heading; its negation is never accepted.
    pub fn sample(
        &mut self,
        keys: &KeySnapshot,
        stick: Option<StickSnapshot>,
        current: Direction,
    ) {
        if let Some(dir) = direction_intent(keys, stick, self.deadzone) {
            if dir != current.opposite() {
                self.queued = dir;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DZ: f32 = 0.5;

    fn keys(up: bool, down: bool, left: bool, right: bool) -> KeySnapshot {
        KeySnapshot {
            up,
            down,
            left,
            right,
        }
    }

    #[test]
    fn stick_inside_deadzone_falls_back_to_keys() {
        let k = keys(true, false, false, false);
        let s = Some(StickSnapshot { x: 0.3, y: -0.4 });
        assert_eq!(direction_intent(&k, s, DZ), Some(Direction::Up));
    }

    #[test]
    fn deflected_stick_overrides_held_keys() {
        let k = keys(true, false, false, false);
        let s = Some(StickSnapshot { x: 0.0, y: 0.9 });
        assert_eq!(direction_intent(&k, s, DZ), Some(Direction::Down));
    }

    #[test]
    fn larger_axis_wins_x_takes_ties() {
        let both = |x, y| direction_intent(&KeySnapshot::default(), Some(StickSnapshot { x, y }), DZ);
        assert_eq!(both(0.9, 0.6), Some(Direction::Right));
        assert_eq!(both(-0.6, 0.9), Some(Direction::Down));
        assert_eq!(both(-0.7, 0.7), Some(Direction::Left));
        assert_eq!(both(0.0, -0.8), Some(Direction::Up));
    }

    #[test]
    fn key_priority_is_fixed() {
        assert_eq!(
            direction_intent(&keys(true, true, true, true), None, DZ),
            Some(Direction::Up)
        );
        assert_eq!(
            direction_intent(&keys(false, true, true, true), None, DZ),
            Some(Direction::Down)
        );
        assert_eq!(
            direction_intent(&keys(false, false, true, true), None, DZ),
            Some(Direction::Left)
        );
    }

    #[test]
    fn no_input_yields_no_intent() {
        assert_eq!(direction_intent(&KeySnapshot::default(), None, DZ), None);
        let s = Some(StickSnapshot { x: 0.1, y: 0.1 });
        assert_eq!(direction_intent(&KeySnapshot::default(), s, DZ), None);
    }

    #[test]
    fn reversal_is_rejected_and_queue_unchanged() {
        let mut a = InputArbiter::new(DZ);
        a.reset(Direction::Right);
        a.sample(&keys(false, false, true, false), None, Direction::Right);
        assert_eq!(a.queued(), Direction::Right);
    }

    #[test]
    fn rejected_candidate_keeps_earlier_accepted_turn() {
        let mut a = InputArbiter::new(DZ);
        a.reset(Direction::Right);
        // Queue a legal turn up, then try to reverse the committed heading.
        a.sample(&keys(true, false, false, false), None, Direction::Right);
        assert_eq!(a.queued(), Direction::Up);
        a.sample(&keys(false, false, true, false), None, Direction::Right);
        assert_eq!(a.queued(), Direction::Up);
    }

    #[test]
    fn stick_reversal_is_also_guarded() {
        let mut a = InputArbiter::new(DZ);
        a.reset(Direction::Up);
        let s = Some(StickSnapshot { x: 0.0, y: 0.9 }); // down = reverse
        a.sample(&KeySnapshot::default(), s, Direction::Up);
        assert_eq!(a.queued(), Direction::Up);
    }

    #[test]
    fn idle_frame_keeps_the_queue() {
        let mut a = InputArbiter::new(DZ);
        a.reset(Direction::Left);
        a.sample(&KeySnapshot::default(), None, Direction::Left);
        assert_eq!(a.queued(), Direction::Left);
    }
}
