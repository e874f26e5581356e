//! Expression state and the keypad operations that mutate it.
//!
//! Each operation is a pure reducer over [`ExpressionState`]: replaying the
//! same key sequence from the same seed always ends in the same state.
//!
//! # Example
//!
//! ```ignore
//! use spark_numpad::engine::ExpressionState;
//! use spark_numpad::Operator;
//!
//! let mut state = ExpressionState::new();
//! state.append_digit(7);
//! state.apply_operator(Operator::Add);
//! state.append_digit(3);
//! assert_eq!(state.evaluate(), 10.0);
//! ```

use crate::types::{NumpadKey, Operator};

use super::evaluate::{evaluate_parts, Part};
use super::numeral::{canonical, parse_numeral, significant_digits, MAX_SIGNIFICANT_DIGITS, SENTINEL};

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionState {
    current_operand: String,
    parts: Vec<Part>,
    base_value: f64,
    active_operator: Option<Operator>,
    initial_field_value: String,
}

impl Default for ExpressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionState {
    /// Fresh state showing the sentinel `0`.
    pub fn new() -> Self {
        Self {
            current_operand: SENTINEL.to_string(),
            parts: Vec::new(),
            base_value: 0.0,
            active_operator: None,
            initial_field_value: String::new(),
        }
    }

    /// Seed a session from a field.
    ///
    /// `value` is the already-parsed field value. Zero and missing values start
    /// with an empty operand so the user never has to delete a placeholder.
    pub fn seeded(value: Option<f64>, initial_field_value: impl Into<String>) -> Self {
        let (current_operand, base_value) = match value {
            Some(v) if v != 0.0 && v.is_finite() => (canonical(v), v),
            _ => (String::new(), 0.0),
        };
        Self {
            current_operand,
            parts: Vec::new(),
            base_value,
            active_operator: None,
            initial_field_value: initial_field_value.into(),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn current_operand(&self) -> &str {
        &self.current_operand
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn active_operator(&self) -> Option<Operator> {
        self.active_operator
    }

    pub fn initial_field_value(&self) -> &str {
        &self.initial_field_value
    }

    /// True when an operator is waiting for its right operand.
    pub fn has_pending_operator(&self) -> bool {
        matches!(self.parts.last(), Some(Part::Operator(_)))
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Dispatch a keypad key.
    pub fn apply_key(&mut self, key: NumpadKey) {
        match key {
            NumpadKey::Digit(d) => self.append_digit(d),
            NumpadKey::Decimal => self.append_decimal_separator(),
            NumpadKey::Operator(op) => self.apply_operator(op),
            NumpadKey::Percent => self.percent(),
            NumpadKey::Clear => self.clear(),
            NumpadKey::Back => self.backspace(),
            NumpadKey::Equals => self.apply_equals(),
        }
    }

    /// Append a digit, replacing the sentinel `0`. Digits above 9 are ignored,
    /// as is any digit past [`MAX_SIGNIFICANT_DIGITS`].
    pub fn append_digit(&mut self, digit: u8) {
        let Some(c) = char::from_digit(u32::from(digit), 10) else {
            return;
        };
        if significant_digits(&self.current_operand) >= MAX_SIGNIFICANT_DIGITS {
            return;
        }
        if self.current_operand == SENTINEL {
            self.current_operand.clear();
        } else if self.current_operand == "-0" {
            self.current_operand.truncate(1);
        }
        self.current_operand.push(c);
    }

    pub fn append_decimal_separator(&mut self) {
        if self.current_operand.contains('.') {
            return;
        }
        if self.current_operand.is_empty() || self.current_operand == "-" {
            self.current_operand.push('0');
        }
        self.current_operand.push('.');
    }

    /// Delete one character of the operand; on an empty operand, take back
    /// the pending operator or fall back to the sentinel.
    pub fn backspace(&mut self) {
        if self.current_operand.pop().is_some() {
            // A seeded total must not outlive the digits it came from
            if parse_numeral(&self.current_operand).is_none() {
                self.base_value = evaluate_parts(&self.parts);
            }
            return;
        }

        if self.has_pending_operator() {
            self.parts.pop();
            // The committed left operand becomes editable again
            if let Some(Part::Number(n)) = self.parts.last().copied() {
                self.parts.pop();
                self.current_operand = canonical(n);
            }
            self.active_operator = self.parts.iter().rev().find_map(|part| match part {
                Part::Operator(op) => Some(*op),
                Part::Number(_) => None,
            });
            self.base_value = self.evaluate();
        } else {
            self.current_operand = SENTINEL.to_string();
        }
    }

    pub fn clear(&mut self) {
        self.current_operand = SENTINEL.to_string();
        self.parts.clear();
        self.base_value = 0.0;
        self.active_operator = None;
    }

    /// Divide the operand by 100. `parts` is not consulted.
    pub fn percent(&mut self) {
        if let Some(value) = parse_numeral(&self.current_operand) {
            self.current_operand = canonical(value / 100.0);
        }
    }

    pub fn apply_operator(&mut self, op: Operator) {
        match parse_numeral(&self.current_operand) {
            Some(value) => match self.parts.last_mut() {
                Some(Part::Number(last)) => *last = value,
                _ => self.parts.push(Part::Number(value)),
            },
            None if self.parts.is_empty() => self.parts.push(Part::Number(self.base_value)),
            None => {}
        }

        match self.parts.last_mut() {
            Some(Part::Operator(pending)) => *pending = op,
            _ => self.parts.push(Part::Operator(op)),
        }

        self.current_operand.clear();
        self.active_operator = Some(op);
        self.base_value = evaluate_parts(&self.parts);
    }

    /// Full token sequence: `parts` plus the pending operand when it parses.
    pub fn tokens(&self) -> Vec<Part> {
        let mut tokens = self.parts.clone();
        if let Some(value) = parse_numeral(&self.current_operand) {
            tokens.push(Part::Number(value));
        }
        tokens
    }

    /// Evaluate without mutating. Always finite.
    pub fn evaluate(&self) -> f64 {
        evaluate_parts(&self.tokens())
    }

    /// `=`: evaluate and collapse to a single operand.
    pub fn apply_equals(&mut self) {
        let value = self.evaluate();
        self.parts.clear();
        self.active_operator = None;
        self.base_value = value;
        self.current_operand = canonical(value);
    }
}
