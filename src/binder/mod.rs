//! Field Binder - Discovers numeric fields and wires them to the numpad.
//!
//! A field is eligible when it carries the opt-in attribute, or is a numeric
//! input (`type="number"`, `inputmode="decimal"`/`"numeric"`) that does not opt
//! out with `data-numpad="off"`. Fields carrying the read-only attribute are
//! made read-only but never open the overlay.
//!
//! Binding only ever *adds* attributes. Values are never touched here.
//!
//! # API
//!
//! - `scan(root)` - Bind every eligible field under `root`
//! - `bind(element)` - Bind one field (idempotent)
//! - `observe(root)` - Install the single mutation watcher
//! - `process_mutations()` - Bind fields reported by the watcher
//! - `wants_numpad(element)` - Whether activation should open the overlay

use std::collections::HashSet;
use std::rc::Rc;

use bitflags::bitflags;
use tracing::debug;

use crate::config::NumpadConfig;
use crate::error::HostError;
use crate::host::{ElementDiscovery, FieldHost, Mutation};
use crate::types::ElementId;

bitflags! {
    /// How a field participates in the numpad.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u8 {
        const NONE = 0;
        /// Native editing is disabled
        const READONLY = 1 << 0;
        /// Activation opens the overlay
        const NUMPAD = 1 << 1;
        /// Eligible through its input type rather than the opt-in attribute
        const NUMERIC_TYPE = 1 << 2;
    }
}

/// Result of a single `bind` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Newly bound with these flags
    Bound(FieldFlags),
    /// Already in the bound set; nothing done
    AlreadyBound,
    /// Does not match the opt-in contract
    NotEligible,
    /// Element vanished between discovery and bind
    Skipped,
}

pub struct FieldBinder {
    host: Rc<dyn FieldHost>,
    discovery: Rc<dyn ElementDiscovery>,
    config: NumpadConfig,
    bound: HashSet<ElementId>,
    numpad_fields: HashSet<ElementId>,
    observed_root: Option<ElementId>,
}

impl FieldBinder {
    pub fn new(
        host: Rc<dyn FieldHost>,
        discovery: Rc<dyn ElementDiscovery>,
        config: NumpadConfig,
    ) -> Self {
        Self {
            host,
            discovery,
            config,
            bound: HashSet::new(),
            numpad_fields: HashSet::new(),
            observed_root: None,
        }
    }

    // =========================================================================
    // CLASSIFICATION
    // =========================================================================

    /// Classify an element against the opt-in contract.
    pub fn classify(&self, element: ElementId) -> Result<FieldFlags, HostError> {
        let opt_in = self.host.attribute(element, &self.config.opt_in_attribute)?;
        let readonly_only = self
            .host
            .attribute(element, &self.config.readonly_attribute)?
            .is_some();

        let opted_out = opt_in
            .as_deref()
            .is_some_and(|value| matches!(value.trim(), "off" | "false"));
        if opted_out {
            return Ok(FieldFlags::NONE);
        }

        if readonly_only {
            return Ok(FieldFlags::READONLY);
        }

        if opt_in.is_some() {
            return Ok(FieldFlags::READONLY | FieldFlags::NUMPAD);
        }

        let input_type = self.host.attribute(element, "type")?;
        let input_mode = self.host.attribute(element, "inputmode")?;
        let numeric = input_type.as_deref() == Some("number")
            || matches!(input_mode.as_deref(), Some("decimal" | "numeric"));

        Ok(if numeric {
            FieldFlags::READONLY | FieldFlags::NUMPAD | FieldFlags::NUMERIC_TYPE
        } else {
            FieldFlags::NONE
        })
    }

    // =========================================================================
    // BINDING
    // =========================================================================

    /// Bind every eligible input under `root`. Returns how many were newly bound.
    pub fn scan(&mut self, root: ElementId) -> usize {
        let candidates = match self.host.query_inputs(root) {
            Ok(candidates) => candidates,
            Err(err) => {
                debug!(root = %root, error = %err, "numpad scan skipped");
                return 0;
            }
        };

        candidates
            .into_iter()
            .filter(|&element| matches!(self.bind(element), BindOutcome::Bound(_)))
            .count()
    }

    /// Bind one element. Free after the first call for that element.
    pub fn bind(&mut self, element: ElementId) -> BindOutcome {
        if self.bound.contains(&element) {
            return BindOutcome::AlreadyBound;
        }

        match self.try_bind(element) {
            Ok(flags) if flags.is_empty() => BindOutcome::NotEligible,
            Ok(flags) => {
                self.bound.insert(element);
                if flags.contains(FieldFlags::NUMPAD) {
                    self.numpad_fields.insert(element);
                }
                BindOutcome::Bound(flags)
            }
            Err(err) => {
                debug!(element = %element, error = %err, "numpad bind skipped");
                BindOutcome::Skipped
            }
        }
    }

    fn try_bind(&self, element: ElementId) -> Result<FieldFlags, HostError> {
        let flags = self.classify(element)?;
        if flags.is_empty() {
            return Ok(flags);
        }

        // Native keyboards stay closed; value and aria-* are left as they are
        self.host.set_attribute(element, "readonly", "")?;
        self.host.set_attribute(element, "inputmode", "none")?;

        if flags.contains(FieldFlags::NUMPAD) {
            self.host.set_attribute(element, "aria-haspopup", "dialog")?;
            let diagnostic_id = self.host.attribute(element, &self.config.id_attribute)?;
            debug!(element = %element, id = ?diagnostic_id, "numpad field bound");
        }
        Ok(flags)
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Install the mutation watcher over `root`. Only one watcher ever exists
    /// per binder; later calls are no-ops.
    pub fn observe(&mut self, root: ElementId) -> Result<(), HostError> {
        if self.observed_root.is_some() {
            return Ok(());
        }
        self.discovery.observe(root, &self.config.watched_attributes())?;
        self.observed_root = Some(root);
        Ok(())
    }

    /// Drain watcher records and bind whatever became eligible.
    /// Returns how many fields were newly bound.
    pub fn process_mutations(&mut self) -> usize {
        if self.observed_root.is_none() {
            return 0;
        }

        let mut newly_bound = 0;
        for mutation in self.discovery.take_records() {
            newly_bound += match mutation {
                Mutation::Inserted(element) => self.scan(element),
                // Our own inputmode writes come back here; bound fields stay as they are
                Mutation::AttributeChanged { element, .. } if self.bound.contains(&element) => 0,
                Mutation::AttributeChanged { element, .. } => {
                    usize::from(matches!(self.bind(element), BindOutcome::Bound(_)))
                }
            };
        }
        newly_bound
    }

    /// Tear down the watcher.
    pub fn disconnect(&mut self) {
        if self.observed_root.take().is_some() {
            self.discovery.disconnect();
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.bound.contains(&element)
    }

    /// True when activating `element` should open the overlay.
    pub fn wants_numpad(&self, element: ElementId) -> bool {
        self.numpad_fields.contains(&element)
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    pub fn is_observing(&self) -> bool {
        self.observed_root.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
