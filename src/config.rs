//! Numpad configuration.
//!
//! All fields have defaults matching the reference deployment (comma decimal
//! separator, 120ms de-duplication window, 250ms post-close suppression).
//! Partial JSON is merged over those defaults:
//!
//! ```ignore
//! let config = NumpadConfig::from_json(r#"{ "decimal_separator": "." }"#)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NumpadError, Result};

/// Border, four one-cell buttons and three gaps.
pub const MIN_KEYPAD_WIDTH: u16 = 9;
/// Border, display rows, spacer and five one-row button rows.
pub const MIN_KEYPAD_HEIGHT: u16 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumpadConfig {
    /// Decimal mark used for display and for values written back to fields.
    pub decimal_separator: char,
    /// Window in which the same key on a different channel is a duplicate.
    pub dedup_window_ms: u64,
    /// Window after close in which non-explicit activations are refused.
    pub focus_suppression_ms: u64,
    /// Boolean attribute requesting the numpad (`off`/`false` opts out).
    pub opt_in_attribute: String,
    /// Diagnostic id attribute, only used for logging.
    pub id_attribute: String,
    /// Attribute requesting read-only behaviour without the overlay.
    pub readonly_attribute: String,
    /// Overlay width in terminal cells.
    pub keypad_width: u16,
    /// Overlay height in terminal cells (border and both display rows included).
    pub keypad_height: u16,
}

impl Default for NumpadConfig {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            dedup_window_ms: 120,
            focus_suppression_ms: 250,
            opt_in_attribute: "data-numpad".to_string(),
            id_attribute: "data-numpad-id".to_string(),
            readonly_attribute: "data-numpad-readonly".to_string(),
            keypad_width: 29,
            keypad_height: 15,
        }
    }
}

impl NumpadConfig {
    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let sep = self.decimal_separator;
        if sep.is_ascii_digit() || "+-×÷*/%=".contains(sep) || sep.is_whitespace() {
            return Err(NumpadError::InvalidConfig(format!(
                "decimal separator {sep:?} collides with keypad input"
            )));
        }
        if self.opt_in_attribute.is_empty() {
            return Err(NumpadError::InvalidConfig(
                "opt-in attribute must not be empty".to_string(),
            ));
        }
        if self.keypad_width < MIN_KEYPAD_WIDTH || self.keypad_height < MIN_KEYPAD_HEIGHT {
            return Err(NumpadError::InvalidConfig(format!(
                "keypad must be at least {MIN_KEYPAD_WIDTH}x{MIN_KEYPAD_HEIGHT} cells"
            )));
        }
        Ok(())
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    pub fn focus_suppression(&self) -> Duration {
        Duration::from_millis(self.focus_suppression_ms)
    }

    /// Attributes whose changes may newly opt an element in.
    pub fn watched_attributes(&self) -> Vec<String> {
        vec![
            self.opt_in_attribute.clone(),
            self.readonly_attribute.clone(),
            "type".to_string(),
            "inputmode".to_string(),
        ]
    }
}
