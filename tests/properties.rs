//! Property tests for the expression engine and the display formatter.

use proptest::prelude::*;
use spark_numpad::engine::{canonical, evaluate_parts, parse_numeral};
use spark_numpad::{DisplayFormatter, DisplayModel, ElementId, ExpressionState, NumpadKey, Operator, Part};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Add),
        Just(Operator::Subtract),
        Just(Operator::Multiply),
        Just(Operator::Divide),
    ]
}

fn numpad_key() -> impl Strategy<Value = NumpadKey> {
    prop_oneof![
        6 => (0u8..10).prop_map(NumpadKey::Digit),
        1 => Just(NumpadKey::Decimal),
        2 => operator().prop_map(NumpadKey::Operator),
        1 => Just(NumpadKey::Percent),
        1 => Just(NumpadKey::Clear),
        1 => Just(NumpadKey::Back),
        1 => Just(NumpadKey::Equals),
    ]
}

fn part() -> impl Strategy<Value = Part> {
    prop_oneof![
        (-1e12f64..1e12).prop_map(Part::Number),
        Just(Part::Number(0.0)),
        operator().prop_map(Part::Operator),
    ]
}

fn replay(keys: &[NumpadKey]) -> ExpressionState {
    let mut state = ExpressionState::new();
    for &key in keys {
        state.apply_key(key);
    }
    state
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn replay_is_deterministic(keys in proptest::collection::vec(numpad_key(), 0..60)) {
        let first = replay(&keys);
        let second = replay(&keys);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.evaluate().to_bits(), second.evaluate().to_bits());
    }

    #[test]
    fn every_state_evaluates_finite(keys in proptest::collection::vec(numpad_key(), 0..80)) {
        let state = replay(&keys);
        prop_assert!(state.evaluate().is_finite());
        prop_assert!(state.base_value().is_finite());

        let model = DisplayModel::project(&DisplayFormatter::new(','), ElementId(1), &state);
        for text in [&model.operand, &model.trace] {
            prop_assert!(!text.contains("NaN"));
            prop_assert!(!text.contains("inf"));
        }
    }

    #[test]
    fn evaluate_parts_is_total(parts in proptest::collection::vec(part(), 0..30)) {
        prop_assert!(evaluate_parts(&parts).is_finite());
    }

    #[test]
    fn canonical_numerals_reparse(value in -1e5f64..1e5) {
        let numeral = canonical(value);
        let parsed = parse_numeral(&numeral);
        prop_assert!(parsed.is_some());
        prop_assert_eq!(canonical(parsed.unwrap_or_default()), numeral);
    }

    #[test]
    fn formatting_is_idempotent(
        value in -1e5f64..1e5,
        separator in prop_oneof![Just(','), Just('.')]
    ) {
        let formatter = DisplayFormatter::new(separator);
        let once = formatter.format_value(value);
        prop_assert_eq!(formatter.format_operand(&once), once.clone());

        let reparsed = formatter.parse_field_value(&once);
        prop_assert!(reparsed.is_some());
        prop_assert_eq!(formatter.format_value(reparsed.unwrap_or_default()), once);
    }
}
