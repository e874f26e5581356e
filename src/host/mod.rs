//! Host Capabilities - The document the numpad is embedded in.
//!
//! The numpad never talks to a concrete UI toolkit. Everything it needs from
//! the page is expressed as two capabilities:
//!
//! - [`FieldHost`] - attribute/value access, notifications and focus
//! - [`ElementDiscovery`] - structural mutation records for late-inserted fields
//!
//! [`SyntheticDocument`] implements both in memory; it backs the tests and the
//! terminal front end.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_numpad::host::SyntheticDocument;
//!
//! let doc = Rc::new(SyntheticDocument::new());
//! let price = doc.append_input(doc.root(), &[("data-numpad", ""), ("value", "12,50")])?;
//! ```

mod synthetic;

pub use synthetic::{FocusChange, SyntheticDocument};

use crate::error::HostError;
use crate::types::ElementId;

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Notification synthesized on a field after a commit.
///
/// Emitted in declaration order: `Input`, `Change`, `NumericCommit`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNotification {
    /// Generic "value changed"
    Input,
    /// Generic "value committed"
    Change,
    /// Structured numpad commit
    NumericCommit {
        /// Locale formatted value written to the field
        value: String,
        /// Parsed numeric value
        numeric: f64,
    },
}

impl FieldNotification {
    /// Event name a DOM host would dispatch.
    pub fn name(&self) -> &'static str {
        match self {
            FieldNotification::Input => "input",
            FieldNotification::Change => "change",
            FieldNotification::NumericCommit { .. } => "numpad:commit",
        }
    }
}

// =============================================================================
// FIELD HOST
// =============================================================================

/// Access to the host document.
///
/// Methods take `&self`; hosts use interior mutability the way a DOM does.
/// Every element-addressed call may fail with [`HostError::Detached`] when the
/// element left the document since it was discovered.
pub trait FieldHost {
    /// Input elements at or below `root`, in document order.
    fn query_inputs(&self, root: ElementId) -> Result<Vec<ElementId>, HostError>;

    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, HostError>;

    fn set_attribute(&self, element: ElementId, name: &str, value: &str) -> Result<(), HostError>;

    fn value(&self, element: ElementId) -> Result<String, HostError>;

    fn set_value(&self, element: ElementId, value: &str) -> Result<(), HostError>;

    /// Deliver a notification to the element's listeners.
    fn dispatch(&self, element: ElementId, notification: FieldNotification) -> Result<(), HostError>;

    /// Element that currently has focus.
    fn active_element(&self) -> Option<ElementId>;

    fn focus(&self, element: ElementId) -> Result<(), HostError>;

    fn blur(&self, element: ElementId) -> Result<(), HostError>;

    /// Element that can take focus without opening a keyboard (e.g. the body).
    fn neutral_element(&self) -> Option<ElementId>;
}

// =============================================================================
// ELEMENT DISCOVERY
// =============================================================================

/// One observed change in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Element (and its subtree) was inserted under the observed root
    Inserted(ElementId),
    /// A filtered attribute changed
    AttributeChanged { element: ElementId, name: String },
}

/// Structural mutation watcher.
///
/// Records accumulate until [`take_records`](Self::take_records) drains them;
/// the host decides when to hand them to the binder (typically once per
/// event-loop turn), so binding never re-enters the watcher synchronously.
pub trait ElementDiscovery {
    /// Start watching `root`. Attribute changes are reported only for names in
    /// `attribute_filter`.
    fn observe(&self, root: ElementId, attribute_filter: &[String]) -> Result<(), HostError>;

    /// Drain pending records.
    fn take_records(&self) -> Vec<Mutation>;

    /// Stop watching and drop pending records.
    fn disconnect(&self);
}

/// Discovery for static documents: nothing is ever inserted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscovery;

impl ElementDiscovery for NoDiscovery {
    fn observe(&self, _root: ElementId, _attribute_filter: &[String]) -> Result<(), HostError> {
        Ok(())
    }

    fn take_records(&self) -> Vec<Mutation> {
        Vec::new()
    }

    fn disconnect(&self) {}
}
