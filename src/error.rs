//! Error types.
//!
//! The engine, formatter and guard are total and never fail. Errors only come
//! from the host boundary (elements that vanished), configuration parsing,
//! keypad layout and terminal output.

use thiserror::Error;

use crate::types::ElementId;

/// Failure reported by a [`FieldHost`](crate::host::FieldHost).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),
    #[error("element {0} is no longer attached to the document")]
    Detached(ElementId),
    #[error("element {element} rejected the operation: {reason}")]
    Rejected { element: ElementId, reason: String },
}

impl HostError {
    /// The element the failure refers to.
    pub fn element(&self) -> ElementId {
        match self {
            HostError::UnknownElement(id) | HostError::Detached(id) => *id,
            HostError::Rejected { element, .. } => *element,
        }
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum NumpadError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("invalid numpad configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid numpad configuration: {0}")]
    InvalidConfig(String),
    #[error("keypad layout failed: {0}")]
    Layout(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = NumpadError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_element() {
        let id = ElementId(4);
        assert_eq!(HostError::Detached(id).element(), id);
        assert_eq!(
            HostError::Rejected { element: id, reason: "disabled".into() }.element(),
            id
        );
    }

    #[test]
    fn test_host_error_converts() {
        let err: NumpadError = HostError::UnknownElement(ElementId(1)).into();
        assert!(matches!(err, NumpadError::Host(HostError::UnknownElement(_))));
        assert_eq!(err.to_string(), "element #1 does not exist");
    }
}
