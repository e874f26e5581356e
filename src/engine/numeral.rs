//! Canonical numerals.
//!
//! The engine stores the operand being typed as an ASCII numeral with `.` as
//! decimal mark. Locale formatting happens only in the display layer.

/// Operand value meaning "nothing typed yet, but show a zero".
pub const SENTINEL: &str = "0";

/// Decimal places kept when turning a computed value back into a numeral.
const PRECISION: usize = 10;

/// Significant digits an `f64` carries exactly; typed operands stop here.
pub const MAX_SIGNIFICANT_DIGITS: usize = 15;

/// Digits of a numeral after its leading zeros.
pub fn significant_digits(numeral: &str) -> usize {
    numeral
        .trim_start_matches(['-', '0', '.'])
        .chars()
        .filter(char::is_ascii_digit)
        .count()
}

/// Parse a canonical numeral.
///
/// Accepts an optional leading `-`, digits and at most one `.`. Anything that
/// would parse to a non-finite value (`inf`, 400 nines) is unparsable.
pub fn parse_numeral(numeral: &str) -> Option<f64> {
    let numeral = numeral.trim();
    if numeral.is_empty() {
        return None;
    }

    let well_formed = numeral
        .char_indices()
        .all(|(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'));
    if !well_formed || numeral.matches('.').count() > 1 {
        return None;
    }
    if !numeral.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    numeral.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Render a value as a canonical numeral: no exponent, no trailing zeros,
/// rounded to ten decimal places so `0.1 + 0.2` reads `0.3`.
///
/// Only the first [`MAX_SIGNIFICANT_DIGITS`] digits are exact; computed
/// results beyond that read back as the nearest `f64`.
pub fn canonical(value: f64) -> String {
    if !value.is_finite() {
        return SENTINEL.to_string();
    }

    if value.abs() >= 1e15 {
        return format!("{value:.0}");
    }

    let text = format!("{:.*}", PRECISION, value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "0" | "-0" => SENTINEL.to_string(),
        text => text.to_string(),
    }
}
