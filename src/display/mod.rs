//! Display Formatter - Human readable projection of the expression state.
//!
//! - [`DisplayFormatter`] - Locale decimal formatting, trace line, field parsing
//! - [`DisplayModel`] - The two display rows plus the commit affordance state

mod format;
mod model;

pub use format::DisplayFormatter;
pub use model::DisplayModel;
