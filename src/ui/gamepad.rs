/// Gamepad input tracker using gilrs.
///
/// D-pad and left stick steer; Start confirms/pauses, Select cancels
/// (both remappable from config.toml). The raw stick axes are exposed for
/// the input arbiter with y converted to screen coordinates (positive =
/// down). No pad, or a pad that disconnects mid-session, degrades
/// silently to keyboard-only: `stick()` reads None and every button query
/// reads false.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::PadConfig;
use crate::ui::arbiter::StickSnapshot;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    Start,
    Select,
}

const BTN_COUNT: usize = 6;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],

    dpad_up: BtnState,
    dpad_down: BtnState,
    dpad_left: BtnState,
    dpad_right: BtnState,

    /// Left stick in gilrs convention (+y up); converted on read.
    stick_x: f32,
    stick_y: f32,

    start_map: Vec<Btn>,
    cancel_map: Vec<Btn>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad_up: BtnState::default(),
            dpad_down: BtnState::default(),
            dpad_left: BtnState::default(),
            dpad_right: BtnState::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            start_map: vec![Btn::Start],
            cancel_map: vec![Btn::Select],
            connected,
        }
    }

    /// Load button mapping from config. Empty/unparseable lists keep the
    /// defaults.
    pub fn load_button_config(&mut self, cfg: &PadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let start = parse_list(&cfg.start);
        if !start.is_empty() {
            self.start_map = start;
        }
        let cancel = parse_list(&cfg.cancel);
        if !cancel.is_empty() {
            self.cancel_map = cancel;
        }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad arrives as buttons; tracked apart from the Btn table.
        let dpad = match gilrs_btn {
            Button::DPadUp => Some(&mut self.dpad_up),
            Button::DPadDown => Some(&mut self.dpad_down),
            Button::DPadLeft => Some(&mut self.dpad_left),
            Button::DPadRight => Some(&mut self.dpad_right),
            _ => None,
        };
        if let Some(state) = dpad {
            if held && !state.held {
                state.just_pressed = true;
            }
            state.held = held;
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            let state = &mut self.buttons[btn as usize];
            if held && !state.held {
                state.just_pressed = true;
            }
            state.held = held;
        }
    }

    // ── Queries ──

    /// Raw analog snapshot for the arbiter, or None without a pad.
    pub fn stick(&self) -> Option<StickSnapshot> {
        if self.connected {
            Some(StickSnapshot {
                x: self.stick_x,
                y: -self.stick_y, // gilrs +y is up; screen +y is down
            })
        } else {
            None
        }
    }

    pub fn dpad_up_held(&self) -> bool {
        self.dpad_up.held
    }
    pub fn dpad_down_held(&self) -> bool {
        self.dpad_down.held
    }
    pub fn dpad_left_held(&self) -> bool {
        self.dpad_left.held
    }
    pub fn dpad_right_held(&self) -> bool {
        self.dpad_right.held
    }

    pub fn start_pressed(&self) -> bool {
        self.any_just_pressed(&self.start_map)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.cancel_map)
    }

    // ── Internal ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }
        self.dpad_up.just_pressed = false;
        self.dpad_down.just_pressed = false;
        self.dpad_left.just_pressed = false;
        self.dpad_right.just_pressed = false;
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad_up = BtnState::default();
        self.dpad_down = BtnState::default();
        self.dpad_left = BtnState::default();
        self.dpad_right = BtnState::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("SOUTH"), Some(Btn::A));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("pedal"), None);
    }

    #[test]
    fn no_pad_reads_as_silence() {
        let mut gp = GamepadState::new();
        gp.connected = false;
        gp.update();
        assert!(gp.stick().is_none());
        assert!(!gp.start_pressed());
        assert!(!gp.dpad_left_held());
    }
}
