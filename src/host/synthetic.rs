//! In-memory document implementing [`FieldHost`] and [`ElementDiscovery`].
//!
//! Elements live in an arena indexed by [`ElementId`]. Removing an element
//! detaches its subtree; ids are never reused, so a stale id reliably reports
//! [`HostError::Detached`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::HostError;
use crate::types::ElementId;

use super::{ElementDiscovery, FieldHost, FieldNotification, Mutation};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    attributes: BTreeMap<String, String>,
    value: String,
    connected: bool,
}

#[derive(Debug, Clone)]
struct Observer {
    root: ElementId,
    attribute_filter: Vec<String>,
}

/// A focus transition recorded by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Focus(ElementId),
    Blur(ElementId),
}

pub struct SyntheticDocument {
    nodes: RefCell<Vec<Node>>,
    active: Cell<Option<ElementId>>,
    observer: RefCell<Option<Observer>>,
    observe_calls: Cell<usize>,
    records: RefCell<Vec<Mutation>>,
    notifications: RefCell<Vec<(ElementId, FieldNotification)>>,
    focus_log: RefCell<Vec<FocusChange>>,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDocument {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        let body = Node {
            tag: "body".to_string(),
            parent: None,
            attributes: BTreeMap::new(),
            value: String::new(),
            connected: true,
        };
        Self {
            nodes: RefCell::new(vec![body]),
            active: Cell::new(None),
            observer: RefCell::new(None),
            observe_calls: Cell::new(0),
            records: RefCell::new(Vec::new()),
            notifications: RefCell::new(Vec::new()),
            focus_log: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    // =========================================================================
    // TREE MUTATION
    // =========================================================================

    /// Append an element under `parent`. A `value` attribute seeds the value.
    pub fn append(
        &self,
        parent: ElementId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<ElementId, HostError> {
        self.check_connected(parent)?;

        let attributes: BTreeMap<String, String> = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let value = attributes.get("value").cloned().unwrap_or_default();

        let id = {
            let mut nodes = self.nodes.borrow_mut();
            let id = ElementId(nodes.len() as u32);
            nodes.push(Node {
                tag: tag.to_string(),
                parent: Some(parent),
                attributes,
                value,
                connected: true,
            });
            id
        };

        if self.is_observed(id) {
            self.records.borrow_mut().push(Mutation::Inserted(id));
        }
        Ok(id)
    }

    /// Append an `<input>` element.
    pub fn append_input(
        &self,
        parent: ElementId,
        attributes: &[(&str, &str)],
    ) -> Result<ElementId, HostError> {
        self.append(parent, "input", attributes)
    }

    /// Detach an element and its subtree.
    pub fn remove(&self, element: ElementId) -> Result<(), HostError> {
        self.check_connected(element)?;
        let doomed: Vec<ElementId> = self
            .all_ids()
            .into_iter()
            .filter(|&id| self.is_within(id, element))
            .collect();

        let mut nodes = self.nodes.borrow_mut();
        for id in doomed {
            nodes[id.0 as usize].connected = false;
            if self.active.get() == Some(id) {
                self.active.set(None);
            }
        }
        Ok(())
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn tag(&self, element: ElementId) -> Option<String> {
        self.nodes.borrow().get(element.0 as usize).map(|node| node.tag.clone())
    }

    pub fn is_connected(&self, element: ElementId) -> bool {
        self.nodes
            .borrow()
            .get(element.0 as usize)
            .is_some_and(|node| node.connected)
    }

    /// Every notification dispatched so far, in order.
    pub fn notifications(&self) -> Vec<(ElementId, FieldNotification)> {
        self.notifications.borrow().clone()
    }

    /// Notifications dispatched on one element.
    pub fn notifications_for(&self, element: ElementId) -> Vec<FieldNotification> {
        self.notifications
            .borrow()
            .iter()
            .filter(|(id, _)| *id == element)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    pub fn focus_log(&self) -> Vec<FocusChange> {
        self.focus_log.borrow().clone()
    }

    /// Number of times `observe` was called.
    pub fn observe_calls(&self) -> usize {
        self.observe_calls.get()
    }

    pub fn is_observing(&self) -> bool {
        self.observer.borrow().is_some()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn all_ids(&self) -> Vec<ElementId> {
        (0..self.nodes.borrow().len() as u32).map(ElementId).collect()
    }

    fn check_connected(&self, element: ElementId) -> Result<(), HostError> {
        match self.nodes.borrow().get(element.0 as usize) {
            None => Err(HostError::UnknownElement(element)),
            Some(node) if !node.connected => Err(HostError::Detached(element)),
            Some(_) => Ok(()),
        }
    }

    /// True if `element` is `ancestor` or below it.
    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = nodes.get(id.0 as usize).and_then(|node| node.parent);
        }
        false
    }

    fn is_observed(&self, element: ElementId) -> bool {
        match self.observer.borrow().as_ref() {
            Some(observer) => self.is_within(element, observer.root),
            None => false,
        }
    }

    fn attribute_is_observed(&self, element: ElementId, name: &str) -> bool {
        match self.observer.borrow().as_ref() {
            Some(observer) => {
                observer.attribute_filter.iter().any(|watched| watched == name)
                    && self.is_within(element, observer.root)
            }
            None => false,
        }
    }
}

// =============================================================================
// FIELD HOST
// =============================================================================

impl FieldHost for SyntheticDocument {
    fn query_inputs(&self, root: ElementId) -> Result<Vec<ElementId>, HostError> {
        self.check_connected(root)?;
        let nodes = self.nodes.borrow();
        let inputs = (0..nodes.len() as u32)
            .map(ElementId)
            .filter(|&id| {
                let node = &nodes[id.0 as usize];
                node.connected && node.tag == "input"
            })
            .collect::<Vec<_>>();
        drop(nodes);

        Ok(inputs.into_iter().filter(|&id| self.is_within(id, root)).collect())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, HostError> {
        self.check_connected(element)?;
        Ok(self.nodes.borrow()[element.0 as usize].attributes.get(name).cloned())
    }

    fn set_attribute(&self, element: ElementId, name: &str, value: &str) -> Result<(), HostError> {
        self.check_connected(element)?;
        self.nodes.borrow_mut()[element.0 as usize]
            .attributes
            .insert(name.to_string(), value.to_string());

        if self.attribute_is_observed(element, name) {
            self.records.borrow_mut().push(Mutation::AttributeChanged {
                element,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn value(&self, element: ElementId) -> Result<String, HostError> {
        self.check_connected(element)?;
        Ok(self.nodes.borrow()[element.0 as usize].value.clone())
    }

    fn set_value(&self, element: ElementId, value: &str) -> Result<(), HostError> {
        self.check_connected(element)?;
        self.nodes.borrow_mut()[element.0 as usize].value = value.to_string();
        Ok(())
    }

    fn dispatch(&self, element: ElementId, notification: FieldNotification) -> Result<(), HostError> {
        self.check_connected(element)?;
        self.notifications.borrow_mut().push((element, notification));
        Ok(())
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.get()
    }

    fn focus(&self, element: ElementId) -> Result<(), HostError> {
        self.check_connected(element)?;
        if let Some(previous) = self.active.get() {
            if previous != element {
                self.focus_log.borrow_mut().push(FocusChange::Blur(previous));
            }
        }
        self.active.set(Some(element));
        self.focus_log.borrow_mut().push(FocusChange::Focus(element));
        Ok(())
    }

    fn blur(&self, element: ElementId) -> Result<(), HostError> {
        self.check_connected(element)?;
        if self.active.get() == Some(element) {
            self.active.set(None);
            self.focus_log.borrow_mut().push(FocusChange::Blur(element));
        }
        Ok(())
    }

    fn neutral_element(&self) -> Option<ElementId> {
        Some(self.root())
    }
}

// =============================================================================
// ELEMENT DISCOVERY
// =============================================================================

impl ElementDiscovery for SyntheticDocument {
    fn observe(&self, root: ElementId, attribute_filter: &[String]) -> Result<(), HostError> {
        self.check_connected(root)?;
        self.observe_calls.set(self.observe_calls.get() + 1);
        *self.observer.borrow_mut() = Some(Observer {
            root,
            attribute_filter: attribute_filter.to_vec(),
        });
        Ok(())
    }

    fn take_records(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    fn disconnect(&self) {
        self.observer.borrow_mut().take();
        self.records.borrow_mut().clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
