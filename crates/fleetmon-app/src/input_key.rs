//! Terminal-independent key events.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary
//! and the headless runner never produces them, so the app crate stays free
//! of terminal types.

/// A key press as the app sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    Backspace,
}

impl InputKey {
    /// Digit value of a `Char('0'..='9')` key
    pub fn digit(&self) -> Option<char> {
        match self {
            InputKey::Char(c) if c.is_ascii_digit() => Some(*c),
            _ => None,
        }
    }
}
