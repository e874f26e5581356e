//! What the overlay shows for one session.

use crate::engine::ExpressionState;
use crate::types::ElementId;

use super::format::DisplayFormatter;

/// Rendered view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    /// Field the session is bound to
    pub field: ElementId,
    /// Running expression, empty when nothing is pending
    pub trace: String,
    /// Operand row
    pub operand: String,
    /// Committing now would change the field
    pub ready: bool,
}

impl DisplayModel {
    /// Project a session state. Pure; safe to call on every keystroke.
    pub fn project(formatter: &DisplayFormatter, field: ElementId, state: &ExpressionState) -> Self {
        let candidate = formatter.format_value(state.evaluate());
        let initial = formatter
            .parse_field_value(state.initial_field_value())
            .map(|value| formatter.format_value(value))
            .unwrap_or_else(|| "0".to_string());

        Self {
            field,
            trace: formatter.format_expression_trace(state),
            operand: formatter.format_current(state),
            ready: candidate != initial,
        }
    }

    /// True when the trace row should be hidden.
    pub fn trace_hidden(&self) -> bool {
        self.trace.is_empty()
    }
}
