//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::fmt;

use crate::model::Point;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Tab,
    Return,
    PadEnter,
    Escape,
    /// A printable key, lowercase
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerMove,
    Mouse(MouseButton),
    Wheel(WheelDirection),
    Key(KeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// A pointer or keyboard event in window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub action: Action,
    pub pos: Point,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(kind: EventKind, action: Action, pos: Point) -> Self {
        Self {
            kind,
            action,
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(pos: Point) -> Self {
        Self::new(EventKind::PointerMove, Action::Press, pos)
    }

    pub fn press(button: MouseButton, pos: Point) -> Self {
        Self::new(EventKind::Mouse(button), Action::Press, pos)
    }

    pub fn release(button: MouseButton, pos: Point) -> Self {
        Self::new(EventKind::Mouse(button), Action::Release, pos)
    }

    pub fn key(code: KeyCode, pos: Point) -> Self {
        Self::new(EventKind::Key(code), Action::Press, pos)
    }

    pub fn wheel(direction: WheelDirection, pos: Point) -> Self {
        Self::new(EventKind::Wheel(direction), Action::Press, pos)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_press(&self) -> bool {
        self.action == Action::Press
    }

    pub fn is_left_press(&self) -> bool {
        self.kind == EventKind::Mouse(MouseButton::Left) && self.is_press()
    }

    pub fn is_left_release(&self) -> bool {
        self.kind == EventKind::Mouse(MouseButton::Left) && self.action == Action::Release
    }
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Pointer or keyboard input for the region
    Input(InputEvent),
    /// Fire any due drag or animation timers
    Tick,
    /// Switch the active category tab
    SetActiveCategory(String),
    /// The content shown in the region changed; realign on the next pass
    ContentChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_bits() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.ctrl());
        assert!(m.shift());
        assert!(!m.alt());
        assert_eq!(m, Modifiers::new(true, true, false, false));
        assert_eq!(m.to_string(), "Ctrl+Shift");
        assert!(Modifiers::NONE.is_empty());
    }
}
