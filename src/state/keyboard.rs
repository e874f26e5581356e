//! Keyboard Module - Keyboard event types and the numpad key map.
//!
//! Events arrive from the host (or from crossterm via the input module) as
//! [`KeyboardEvent`]s carrying DOM-style key names (`"a"`, `"Enter"`,
//! `"Backspace"`). While the overlay is open they are mapped with [`map_key`]:
//!
//! | Key                    | Command        |
//! |------------------------|----------------|
//! | `0`-`9`                | digit          |
//! | `,` `.`                | decimal        |
//! | `Backspace`            | `BACK`         |
//! | `Delete`               | `C`            |
//! | `+` `-`                | add / subtract |
//! | `*` `x` `X` `×`        | multiply       |
//! | `/` `÷`                | divide         |
//! | `%` `=`                | percent / equals |
//! | `Escape`               | cancel         |
//! | `Enter`                | commit         |

use crate::types::{ActionKey, NumpadKey, Operator};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Ctrl, Alt or Meta held: the key is a shortcut, not text.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press or auto-repeat; releases never act.
    pub fn is_actionable(&self) -> bool {
        self.state != KeyState::Release
    }
}

// =============================================================================
// KEY MAP
// =============================================================================

/// What a keyboard event means while the overlay is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Press(NumpadKey),
    Commit,
    Cancel,
    /// Swallowed without effect
    Ignore,
}

impl KeyCommand {
    /// The action this command feeds into the guard, if any.
    pub fn action_key(self) -> Option<ActionKey> {
        match self {
            KeyCommand::Press(key) => Some(ActionKey::Keypad(key)),
            KeyCommand::Commit => Some(ActionKey::Commit),
            KeyCommand::Cancel => Some(ActionKey::Cancel),
            KeyCommand::Ignore => None,
        }
    }
}

/// Map a keyboard event to a numpad command.
pub fn map_key(event: &KeyboardEvent) -> KeyCommand {
    if !event.is_actionable() || event.modifiers.is_command() {
        return KeyCommand::Ignore;
    }

    match event.key.as_str() {
        "Escape" => KeyCommand::Cancel,
        "Enter" => KeyCommand::Commit,
        "Backspace" => KeyCommand::Press(NumpadKey::Back),
        "Delete" => KeyCommand::Press(NumpadKey::Clear),
        key => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => map_char(c),
                _ => KeyCommand::Ignore,
            }
        }
    }
}

fn map_char(c: char) -> KeyCommand {
    let key = match c {
        '0'..='9' => NumpadKey::Digit(c as u8 - b'0'),
        ',' | '.' => NumpadKey::Decimal,
        '+' => NumpadKey::Operator(Operator::Add),
        '-' => NumpadKey::Operator(Operator::Subtract),
        '*' | 'x' | 'X' | '×' => NumpadKey::Operator(Operator::Multiply),
        '/' | '÷' => NumpadKey::Operator(Operator::Divide),
        '%' => NumpadKey::Percent,
        '=' => NumpadKey::Equals,
        _ => return KeyCommand::Ignore,
    };
    KeyCommand::Press(key)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str) -> KeyCommand {
        map_key(&KeyboardEvent::new(key))
    }

    #[test]
    fn test_digits() {
        for d in 0..=9u8 {
            assert_eq!(press(&d.to_string()), KeyCommand::Press(NumpadKey::Digit(d)));
        }
    }

    #[test]
    fn test_decimal_marks() {
        assert_eq!(press(","), KeyCommand::Press(NumpadKey::Decimal));
        assert_eq!(press("."), KeyCommand::Press(NumpadKey::Decimal));
    }

    #[test]
    fn test_operators() {
        assert_eq!(press("+"), KeyCommand::Press(NumpadKey::Operator(Operator::Add)));
        assert_eq!(press("-"), KeyCommand::Press(NumpadKey::Operator(Operator::Subtract)));
        for key in ["*", "x", "X"] {
            assert_eq!(press(key), KeyCommand::Press(NumpadKey::Operator(Operator::Multiply)));
        }
        assert_eq!(press("/"), KeyCommand::Press(NumpadKey::Operator(Operator::Divide)));
        assert_eq!(press("%"), KeyCommand::Press(NumpadKey::Percent));
        assert_eq!(press("="), KeyCommand::Press(NumpadKey::Equals));
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(press("Backspace"), KeyCommand::Press(NumpadKey::Back));
        assert_eq!(press("Delete"), KeyCommand::Press(NumpadKey::Clear));
        assert_eq!(press("Escape"), KeyCommand::Cancel);
        assert_eq!(press("Enter"), KeyCommand::Commit);
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        assert_eq!(press("a"), KeyCommand::Ignore);
        assert_eq!(press("ArrowUp"), KeyCommand::Ignore);
        assert_eq!(press("Tab"), KeyCommand::Ignore);
        assert_eq!(press(""), KeyCommand::Ignore);
    }

    #[test]
    fn test_shortcuts_ignored() {
        let event = KeyboardEvent::with_modifiers("c", Modifiers::ctrl());
        assert_eq!(map_key(&event), KeyCommand::Ignore);

        let event = KeyboardEvent::with_modifiers("5", Modifiers::ctrl());
        assert_eq!(map_key(&event), KeyCommand::Ignore);

        // Shift is how `+` and `%` are typed on most layouts
        let event = KeyboardEvent::with_modifiers("+", Modifiers::shift());
        assert_eq!(map_key(&event), KeyCommand::Press(NumpadKey::Operator(Operator::Add)));
    }

    #[test]
    fn test_release_ignored_repeat_honoured() {
        let mut event = KeyboardEvent::new("Backspace");
        event.state = KeyState::Release;
        assert_eq!(map_key(&event), KeyCommand::Ignore);

        event.state = KeyState::Repeat;
        assert_eq!(map_key(&event), KeyCommand::Press(NumpadKey::Back));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(KeyCommand::Commit.action_key(), Some(ActionKey::Commit));
        assert_eq!(KeyCommand::Ignore.action_key(), None);
    }
}
