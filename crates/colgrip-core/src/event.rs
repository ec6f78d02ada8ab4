#![forbid(unsafe_code)]

//! Canonical input types for column-resize interactions.
//!
//! Hosts translate their native pointer and keyboard events into these
//! types before handing them to the resize controller.
//!
//! # Design Notes
//!
//! - Pointer coordinates are signed so deltas and mirrored positions never
//!   need a separate type.
//! - Pointer id `0` is reserved/invalid; [`PointerId::KEYBOARD`] is reserved
//!   for sequences synthesized from key presses.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Identity of the pointer that drives a resize session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(u32);

impl PointerId {
    /// Reserved identity used for keyboard-synthesized sequences.
    pub const KEYBOARD: Self = Self(u32::MAX);

    /// Create a pointer id. Returns `None` for the reserved value `0`.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Raw numeric identity.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this id stands for a keyboard-synthesized sequence.
    #[must_use]
    pub const fn is_keyboard(self) -> bool {
        self.0 == u32::MAX
    }
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_keyboard() {
            f.write_str("keyboard")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Pointer button for resize interaction events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Primary button (left mouse button, pen contact, touch contact).
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Pointer position in host viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether the event is a press or auto-repeat (not a release).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes relevant to resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Escape key.
    Escape,

    /// Enter/Return key.
    Enter,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
