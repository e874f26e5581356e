//! Two-tier evaluation of a token sequence.
//!
//! Pass one folds `×`/`÷` left to right, pass two folds `+`/`-` left to right.
//! There are no parentheses; the keypad never has more than one pending
//! operator, so nothing beyond two tiers is needed.
//!
//! Malformed sequences are normalised rather than rejected:
//! - two adjacent operands: the later one replaces the earlier
//! - two adjacent operators: the later one replaces the earlier
//! - a leading operator is ignored, a dangling trailing operator is dropped
//!
//! Any step that would produce a non-finite value (division by zero,
//! overflow) yields its left operand instead.

use crate::types::Operator;

/// One element of an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Part {
    Number(f64),
    Operator(Operator),
}

/// Apply one operator. Never returns NaN or infinity for finite inputs.
pub fn apply(left: f64, op: Operator, right: f64) -> f64 {
    let result = match op {
        Operator::Add => left + right,
        Operator::Subtract => left - right,
        Operator::Multiply => left * right,
        Operator::Divide => {
            if right == 0.0 {
                return left;
            }
            left / right
        }
    };

    if result.is_finite() { result } else { left }
}

/// Evaluate a token sequence. Empty input evaluates to `0`.
pub fn evaluate_parts<'a>(parts: impl IntoIterator<Item = &'a Part>) -> f64 {
    let mut numbers: Vec<f64> = Vec::new();
    let mut operators: Vec<Operator> = Vec::new();

    for part in parts {
        match *part {
            Part::Number(n) => {
                let n = if n.is_finite() { n } else { 0.0 };
                if numbers.len() == operators.len() {
                    numbers.push(n);
                } else if let Some(last) = numbers.last_mut() {
                    *last = n;
                }
            }
            Part::Operator(op) => {
                if numbers.len() > operators.len() {
                    operators.push(op);
                } else if let Some(last) = operators.last_mut() {
                    *last = op;
                }
            }
        }
    }

    // Dangling operator has no right operand
    if operators.len() == numbers.len() {
        operators.pop();
    }

    let Some((&first, rest)) = numbers.split_first() else {
        return 0.0;
    };

    // Pass 1: multiplicative tier
    let mut terms: Vec<f64> = vec![first];
    let mut additive: Vec<Operator> = Vec::new();
    for (&op, &rhs) in operators.iter().zip(rest) {
        if op.is_multiplicative() {
            if let Some(lhs) = terms.last_mut() {
                *lhs = apply(*lhs, op, rhs);
            }
        } else {
            additive.push(op);
            terms.push(rhs);
        }
    }

    // Pass 2: additive tier
    let mut result = terms[0];
    for (&op, &rhs) in additive.iter().zip(&terms[1..]) {
        result = apply(result, op, rhs);
    }
    result
}
