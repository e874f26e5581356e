use crate::engine::ExpressionState;
use crate::types::ElementId;

/// An open overlay bound to one field.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) field: ElementId,
    pub(crate) state: ExpressionState,
    /// Focus owner when the session opened; restored on cancel.
    pub(crate) previous_focus: Option<ElementId>,
}

/// How the overlay leaves the `Open` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Write the result back to the field
    Commit,
    /// Discard all input
    Cancel,
}

/// What a commit wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub field: ElementId,
    /// Locale formatted value written to the field
    pub value: String,
    pub numeric: f64,
}
