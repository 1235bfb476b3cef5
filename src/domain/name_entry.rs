/// Name entry editor: the cursor submachine behind the "enter your score"
/// screen.
///
/// Four character slots plus a virtual submit slot at cursor position 4.
/// Up/down spins the character wheel at the cursor (wrapping), left/right
/// moves the cursor (clamped). Every navigation action shares one cooldown
/// so a held stick deflection steps at a readable rate instead of
/// free-running through the wheel.

use std::time::{Duration, Instant};

pub const NAME_LEN: usize = 4;

/// Cursor position of the virtual submit slot.
pub const SUBMIT_SLOT: usize = NAME_LEN;

const NAV_COOLDOWN: Duration = Duration::from_millis(160);

/// The 37-symbol wheel: letters, digits, space.
const CHARSET: [char; 37] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3',
    '4', '5', '6', '7', '8', '9', ' ',
];

/// Index of the blank symbol; slots start here.
const BLANK: usize = CHARSET.len() - 1;

pub struct NameEntry {
    slots: [usize; NAME_LEN],
    cursor: usize,
    last_nav: Option<Instant>,
}

impl NameEntry {
    pub fn new() -> Self {
        NameEntry {
            slots: [BLANK; NAME_LEN],
            cursor: 0,
            last_nav: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current slot characters, for rendering.
    pub fn chars(&self) -> [char; NAME_LEN] {
        let mut out = [' '; NAME_LEN];
        for (i, &idx) in self.slots.iter().enumerate() {
            out[i] = CHARSET[idx];
        }
        out
    }

    /// The name that would be committed: the joined buffer, or "AAAA" when
    /// every slot is still blank.
    pub fn name(&self) -> String {
        let joined: String = self.chars().iter().collect();
        if joined.trim().is_empty() {
            "AAAA".to_string()
        } else {
            joined
        }
    }

    pub fn left(&mut self, now: Instant) {
        if !self.take_cooldown(now) {
            return;
        }
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self, now: Instant) {
        if !self.take_cooldown(now) {
            return;
        }
        self.cursor = (self.cursor + 1).min(SUBMIT_SLOT);
    }

    /// Spin the wheel forward, or submit when the cursor sits on the submit
    /// slot. Returns true on submit.
    pub fn up(&mut self, now: Instant) -> bool {
        if !self.take_cooldown(now) {
            return false;
        }
        if self.cursor == SUBMIT_SLOT {
            return true;
        }
        self.slots[self.cursor] = (self.slots[self.cursor] + 1) % CHARSET.len();
        false
    }

    /// Spin the wheel backward. No effect on the submit slot.
    pub fn down(&mut self, now: Instant) {
        if !self.take_cooldown(now) {
            return;
        }
        if self.cursor < NAME_LEN {
            self.slots[self.cursor] =
                (self.slots[self.cursor] + CHARSET.len() - 1) % CHARSET.len();
        }
    }

    /// Confirm button: submits only from the submit slot.
    pub fn confirm(&mut self, now: Instant) -> bool {
        if self.cursor != SUBMIT_SLOT {
            return false;
        }
        self.take_cooldown(now)
    }

    /// One shared rate limit for all navigation, keyboard and analog alike.
    fn take_cooldown(&mut self, now: Instant) -> bool {
        match self.last_nav {
            Some(t) if now.duration_since(t) < NAV_COOLDOWN => false,
            _ => {
                self.last_nav = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A time comfortably past any cooldown window, n steps in.
    fn t(base: Instant, n: u64) -> Instant {
        base + NAV_COOLDOWN * (n as u32 + 1)
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        e.left(t(base, 0));
        assert_eq!(e.cursor(), 0);
        for n in 1..=8 {
            e.right(t(base, n));
        }
        assert_eq!(e.cursor(), SUBMIT_SLOT);
    }

    #[test]
    fn wheel_wraps_both_ways() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        // Slots start blank (last wheel index); one step forward wraps to 'A'.
        assert!(!e.up(t(base, 0)));
        assert_eq!(e.chars()[0], 'A');
        // Backward from 'A' wraps to blank.
        e.down(t(base, 1));
        assert_eq!(e.chars()[0], ' ');
        // And backward again lands on '9'.
        e.down(t(base, 2));
        assert_eq!(e.chars()[0], '9');
    }

    #[test]
    fn cooldown_blocks_rapid_nav() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        e.right(t(base, 0));
        assert_eq!(e.cursor(), 1);
        // A second nav within the window is swallowed.
        e.right(t(base, 0) + Duration::from_millis(10));
        assert_eq!(e.cursor(), 1);
        // After the window it goes through.
        e.right(t(base, 1));
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn cooldown_is_shared_across_actions() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        assert!(!e.up(t(base, 0)));
        // An immediate cursor move rides the same cooldown.
        e.right(t(base, 0) + Duration::from_millis(5));
        assert_eq!(e.cursor(), 0);
    }

    #[test]
    fn blank_buffer_submits_default_name() {
        let e = NameEntry::new();
        assert_eq!(e.name(), "AAAA");
    }

    #[test]
    fn partial_buffer_keeps_spaces() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        e.up(t(base, 0)); // slot 0 -> 'A'
        e.up(t(base, 1)); // slot 0 -> 'B'
        assert_eq!(e.name(), "B   ");
    }

    #[test]
    fn submit_only_from_submit_slot() {
        let base = Instant::now();
        let mut e = NameEntry::new();
        assert!(!e.confirm(t(base, 0)));
        assert!(!e.up(t(base, 1)));
        for n in 2..=6 {
            e.right(t(base, n));
        }
        assert_eq!(e.cursor(), SUBMIT_SLOT);
        assert!(e.up(t(base, 7)));
        assert!(e.confirm(t(base, 8)));
    }
}
