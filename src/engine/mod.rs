//! Expression Engine - Calculator state and evaluation.
//!
//! The engine is host independent. It owns:
//! - Numeral: canonical ASCII numerals (`.` decimal mark) for the typed operand
//! - Evaluate: two-tier (`× ÷` then `+ -`) left-to-right reduction
//! - Expression: [`ExpressionState`] and the keypad operations on it
//!
//! # Totality
//!
//! Every reachable state evaluates to a finite number. Division by zero and
//! overflow yield the left operand; a dangling operator is dropped.
//!
//! ```text
//! 7 + 3 × 2   →  parts [7, +, 3, ×]  operand "2"  →  13
//! 8 ÷ 0       →  8
//! 5 −         →  5
//! ```

mod evaluate;
mod expression;
mod numeral;

pub use evaluate::{apply, evaluate_parts, Part};
pub use expression::ExpressionState;
pub use numeral::{canonical, parse_numeral, significant_digits, MAX_SIGNIFICANT_DIGITS, SENTINEL};
