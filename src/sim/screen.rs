/// Screen flow: one explicit state machine over the seven screens.
///
/// Transition table (event → next):
///
///   Menu          start (edge press / armed stick deflect)  → Playing
///   Playing       pause                                     → Paused
///   Playing       round over, not qualifying                → GameOver
///   Playing       round over, new #1                        → TopCelebrate
///   Playing       round over, qualifying                    → EnterScore
///   Paused        resume                                    → Playing
///   GameOver      lock timer elapses                        → Menu
///   TopCelebrate  hold timer elapses                        → EnterScore
///   EnterScore    name submitted                            → PostSubmit
///   EnterScore    cancel                                    → GameOver
///   PostSubmit    hold timer elapses                        → Menu
///
/// Timers are plain `Instant` deadlines compared against the single clock
/// read of the frame. GameOver and PostSubmit double as lock-out windows:
/// while they run, no path accepts a start, so a stick still held from the
/// crash cannot instantly relaunch the game. On top of that, the Menu only
/// accepts an analog start after the stick has been seen neutral once
/// since the Menu appeared.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver,
    TopCelebrate,
    EnterScore,
    PostSubmit,
}

pub const GAME_OVER_LOCK: Duration = Duration::from_millis(2500);
pub const CELEBRATE_HOLD: Duration = Duration::from_millis(3000);
pub const POST_SUBMIT_HOLD: Duration = Duration::from_millis(2000);

pub struct ScreenFlow {
    screen: Screen,
    deadline: Option<Instant>,
    /// Menu analog latch: a deflection only starts the game after the
    /// stick has read neutral at least once on this Menu visit.
    analog_armed: bool,
}

impl ScreenFlow {
    pub fn new() -> Self {
        ScreenFlow {
            screen: Screen::Menu,
            deadline: None,
            analog_armed: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Timer-driven transitions. Call once per frame.
    pub fn update(&mut self, now: Instant) {
        let due = matches!(self.deadline, Some(d) if now >= d);
        if !due {
            return;
        }
        match self.screen {
            Screen::GameOver | Screen::PostSubmit => self.enter_menu(),
            Screen::TopCelebrate => {
                self.screen = Screen::EnterScore;
                self.deadline = None;
            }
            _ => self.deadline = None,
        }
    }

    /// Report the stick's neutral state while on the Menu.
    pub fn note_analog(&mut self, neutral: bool) {
        if self.screen == Screen::Menu && neutral {
            self.analog_armed = true;
        }
    }

    /// Start request on the Menu. `digital` must be an edge-triggered
    /// press; `analog_deflected` is gated by the neutral latch.
    /// Returns true when the game starts (caller resets world and clock).
    pub fn menu_start(&mut self, digital: bool, analog_deflected: bool) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        if digital || (analog_deflected && self.analog_armed) {
            self.screen = Screen::Playing;
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn pause(&mut self) {
        if self.screen == Screen::Playing {
            self.screen = Screen::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Paused {
            self.screen = Screen::Playing;
        }
    }

    /// The round ended (collision or full board). Branch on whether the
    /// score earns a slot and whether it takes the #1 spot.
    pub fn round_over(&mut self, now: Instant, qualifies: bool, is_top: bool) {
        if self.screen != Screen::Playing {
            return;
        }
        if !qualifies {
            self.screen = Screen::GameOver;
            self.deadline = Some(now + GAME_OVER_LOCK);
        } else if is_top {
            self.screen = Screen::TopCelebrate;
            self.deadline = Some(now + CELEBRATE_HOLD);
        } else {
            self.screen = Screen::EnterScore;
            self.deadline = None;
        }
    }

    pub fn name_submitted(&mut self, now: Instant) {
        if self.screen == Screen::EnterScore {
            self.screen = Screen::PostSubmit;
            self.deadline = Some(now + POST_SUBMIT_HOLD);
        }
    }

    pub fn name_cancelled(&mut self, now: Instant) {
        if self.screen == Screen::EnterScore {
            self.screen = Screen::GameOver;
            self.deadline = Some(now + GAME_OVER_LOCK);
        }
    }

    fn enter_menu(&mut self) {
        self.screen = Screen::Menu;
        self.deadline = None;
        self.analog_armed = false;
    }
}
