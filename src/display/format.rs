//! Locale formatting of operands and the expression trace.
//!
//! One decimal separator, never thousands separators: while typing, `1.234`
//! must not be ambiguous between a thousand and one-point-two.

use crate::engine::{canonical, parse_numeral, ExpressionState, Part};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFormatter {
    decimal_separator: char,
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new(',')
    }
}

impl DisplayFormatter {
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Format a numeral string (canonical or already formatted).
    ///
    /// Idempotent: formatting a formatted string returns it unchanged.
    pub fn format_operand(&self, numeral: &str) -> String {
        let numeral = numeral.trim();
        if numeral.is_empty() {
            return "0".to_string();
        }
        numeral
            .chars()
            .map(|c| match c {
                '.' | ',' => self.decimal_separator,
                c => c,
            })
            .collect()
    }

    /// Format a computed value.
    pub fn format_value(&self, value: f64) -> String {
        self.format_operand(&canonical(value))
    }

    /// Operand row: the typed operand, or the running total while nothing is typed.
    pub fn format_current(&self, state: &ExpressionState) -> String {
        if state.current_operand().is_empty() {
            self.format_value(state.base_value())
        } else {
            self.format_operand(state.current_operand())
        }
    }

    /// Trace row: `12 + 3 ×` style line, empty when nothing is pending.
    pub fn format_expression_trace(&self, state: &ExpressionState) -> String {
        if state.parts().is_empty() {
            return String::new();
        }

        let mut pieces: Vec<String> = state
            .parts()
            .iter()
            .map(|part| match part {
                Part::Number(n) => self.format_value(*n),
                Part::Operator(op) => op.symbol().to_string(),
            })
            .collect();

        if !state.current_operand().is_empty() {
            pieces.push(self.format_operand(state.current_operand()));
        }

        pieces.join(" ")
    }

    /// Parse a field's textual value (`"1 234,50 €"`, `"3.14"`, `""`).
    ///
    /// When the configured separator is present, the other mark is treated as
    /// grouping and dropped. Currency symbols and spaces are ignored.
    pub fn parse_field_value(&self, raw: &str) -> Option<f64> {
        let sep = self.decimal_separator;
        let other = if sep == ',' { '.' } else { ',' };
        let has_sep = raw.contains(sep);

        let mut numeral = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_digit() {
                numeral.push(c);
            } else if c == sep {
                numeral.push('.');
            } else if c == other {
                if !has_sep {
                    numeral.push('.');
                }
            } else if c == '-' && numeral.is_empty() {
                numeral.push('-');
            }
        }

        parse_numeral(&numeral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operator;

    fn comma() -> DisplayFormatter {
        DisplayFormatter::new(',')
    }

    #[test]
    fn test_format_operand() {
        let f = comma();
        assert_eq!(f.format_operand("3.14"), "3,14");
        assert_eq!(f.format_operand("3."), "3,");
        assert_eq!(f.format_operand("10"), "10");
        assert_eq!(f.format_operand(""), "0");
    }

    #[test]
    fn test_format_operand_idempotent() {
        let f = comma();
        for numeral in ["3.14", "0.", "-2.5", "1000000", ""] {
            let once = f.format_operand(numeral);
            assert_eq!(f.format_operand(&once), once);
        }
    }

    #[test]
    fn test_format_value_has_no_grouping() {
        assert_eq!(comma().format_value(1234567.5), "1234567,5");
        assert_eq!(DisplayFormatter::new('.').format_value(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_trace_empty_when_nothing_pending() {
        let mut state = ExpressionState::new();
        assert_eq!(comma().format_expression_trace(&state), "");
        state.append_digit(4);
        assert_eq!(comma().format_expression_trace(&state), "");
    }

    #[test]
    fn test_trace_lists_parts_and_operand() {
        let mut state = ExpressionState::new();
        state.append_digit(1);
        state.append_digit(2);
        state.apply_operator(Operator::Add);
        assert_eq!(comma().format_expression_trace(&state), "12 +");

        state.append_digit(3);
        state.append_decimal_separator();
        state.append_digit(5);
        assert_eq!(comma().format_expression_trace(&state), "12 + 3,5");
    }

    #[test]
    fn test_current_shows_running_total() {
        let mut state = ExpressionState::new();
        state.append_digit(9);
        state.apply_operator(Operator::Multiply);
        assert_eq!(comma().format_current(&state), "9");
        state.append_digit(2);
        assert_eq!(comma().format_current(&state), "2");
    }

    #[test]
    fn test_parse_field_value() {
        let f = comma();
        assert_eq!(f.parse_field_value("3,14"), Some(3.14));
        assert_eq!(f.parse_field_value("1.234,50 €"), Some(1234.5));
        assert_eq!(f.parse_field_value("12.5"), Some(12.5));
        assert_eq!(f.parse_field_value("-7"), Some(-7.0));
        assert_eq!(f.parse_field_value(""), None);
        assert_eq!(f.parse_field_value("abc"), None);
    }
}
