//! Mouse Module - Mouse event types
//!
//! Terminal mouse reports carry a button transition and a cell position.
//! The front end hit-tests them against the keypad layout. A primary
//! button-down is the press and arrives on the pointer channel; the matching
//! button-up is only a release, so a click enters its key once no matter how
//! long the button is held.

use super::keyboard::Modifiers;
use crate::types::Channel;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a mouse down event
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    /// Create a mouse up event
    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    /// Channel this report stands for when it presses something.
    ///
    /// Only a primary-button down presses; releases, drags and moves are `None`.
    pub fn press_channel(&self) -> Option<Channel> {
        match (self.action, self.button) {
            (MouseAction::Down, MouseButton::Left) => Some(Channel::Pointer),
            _ => None,
        }
    }
}
