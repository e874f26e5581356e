//! Core types shared by the engine, the guard and the overlay controller.
//!
//! - [`ElementId`] - Opaque identity of a host element
//! - [`Operator`] - The four arithmetic operators on the keypad
//! - [`NumpadKey`] - Logical keypad keys fed to the expression engine
//! - [`ActionKey`] - Everything a press can mean (keypad key, commit, cancel)
//! - [`Channel`] - Event family an action arrived through

use std::fmt;

// =============================================================================
// ELEMENT IDENTITY
// =============================================================================

/// Opaque identity of an element owned by the host document.
///
/// Ids are never dereferenced by the numpad itself; they are handed back to the
/// host, which decides whether the element still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// OPERATORS
// =============================================================================

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol shown on the keypad and in the expression trace.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Multiplicative operators bind tighter than additive ones.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }

    /// Parse a keypad symbol (`+ - × ÷`).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '×' => Some(Operator::Multiply),
            '÷' => Some(Operator::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// =============================================================================
// KEYS
// =============================================================================

/// A logical keypad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumpadKey {
    /// Digit 0-9
    Digit(u8),
    /// Decimal separator
    Decimal,
    Operator(Operator),
    Percent,
    /// `C`
    Clear,
    /// `BACK`
    Back,
    /// `=`
    Equals,
}

impl NumpadKey {
    /// Digit key, or `None` when `digit > 9`.
    pub fn digit(digit: u8) -> Option<Self> {
        (digit <= 9).then_some(NumpadKey::Digit(digit))
    }

    /// Label printed on the keypad button.
    pub fn label(self, decimal_separator: char) -> String {
        match self {
            NumpadKey::Digit(d) => d.to_string(),
            NumpadKey::Decimal => decimal_separator.to_string(),
            NumpadKey::Operator(op) => op.symbol().to_string(),
            NumpadKey::Percent => "%".to_string(),
            NumpadKey::Clear => "C".to_string(),
            NumpadKey::Back => "⌫".to_string(),
            NumpadKey::Equals => "=".to_string(),
        }
    }
}

/// What a single press means to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Keypad(NumpadKey),
    Commit,
    Cancel,
}

impl ActionKey {
    pub fn label(self, decimal_separator: char) -> String {
        match self {
            ActionKey::Keypad(key) => key.label(decimal_separator),
            ActionKey::Commit => "OK".to_string(),
            ActionKey::Cancel => "✕".to_string(),
        }
    }
}

impl From<NumpadKey> for ActionKey {
    fn from(key: NumpadKey) -> Self {
        ActionKey::Keypad(key)
    }
}

// =============================================================================
// CHANNELS
// =============================================================================

/// Event family a press or activation arrived through.
///
/// One physical tap can surface as `Pointer`, `Touch` and `Mouse` events at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `pointerdown`
    Pointer,
    /// `touchstart`
    Touch,
    /// `mousedown` / `click`
    Mouse,
    Keyboard,
    /// `focus` on a field
    Focus,
    /// Synthesized by code rather than by the user
    Programmatic,
}

impl Channel {
    /// True for a fresh, explicit pointer-down (bypasses focus suppression).
    pub fn is_explicit_press(self) -> bool {
        matches!(self, Channel::Pointer | Channel::Touch)
    }
}
