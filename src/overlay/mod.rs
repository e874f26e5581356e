//! Overlay Controller - The numpad's `Closed` / `Open` state machine.
//!
//! One controller owns everything a numpad instance needs: the binder, the
//! input guard, the session and the render queue. Nothing is global, so
//! several controllers can serve different parts of a document side by side.
//!
//! # Lifecycle
//!
//! ```text
//! create(host, discovery, config) → attach(root) → handle_event(..)* → dispose()
//! ```
//!
//! # Events
//!
//! Hosts feed raw interaction through [`NumpadController::handle_event`]:
//!
//! - `Activate` - a bound field was focused, tapped or clicked
//! - `Press` - a keypad button was pressed through some channel
//! - `Keyboard` - a hardware key while the overlay is open
//! - `Backdrop` - a tap outside the panel
//!
//! Presses go through the [`InputGuard`] first; nothing downstream sees
//! channels.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Instant;
//! use spark_numpad::{NumpadController, NumpadConfig, HostEvent, Channel};
//!
//! let doc = Rc::new(SyntheticDocument::new());
//! let price = doc.append_input(doc.root(), &[("data-numpad", "")])?;
//!
//! let mut numpad = NumpadController::create(doc.clone(), doc.clone(), NumpadConfig::default())?;
//! numpad.attach(doc.root())?;
//! numpad.handle_event(HostEvent::Activate { field: price, channel: Channel::Pointer }, Instant::now());
//! ```

mod session;

pub use session::{CloseMode, Committed};

use std::rc::Rc;
use std::time::Instant;

use spark_signals::Signal;
use tracing::{debug, info, warn};

use crate::binder::FieldBinder;
use crate::config::NumpadConfig;
use crate::display::{DisplayFormatter, DisplayModel};
use crate::engine::{canonical, ExpressionState};
use crate::error::{HostError, Result};
use crate::host::{ElementDiscovery, FieldHost, FieldNotification};
use crate::pipeline::{ImmediateScheduler, RenderQueue, RenderScheduler, Snapshot};
use crate::state::{map_key, Action, InputGuard, KeyboardEvent};
use crate::types::{ActionKey, Channel, ElementId, NumpadKey};

use session::Session;

// =============================================================================
// HOST EVENTS
// =============================================================================

/// Raw interaction reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A field was activated (focus, tap, click)
    Activate { field: ElementId, channel: Channel },
    /// A keypad button was pressed
    Press { key: ActionKey, channel: Channel },
    /// A hardware key
    Keyboard(KeyboardEvent),
    /// A tap outside the panel
    Backdrop,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct NumpadController {
    host: Rc<dyn FieldHost>,
    config: NumpadConfig,
    formatter: DisplayFormatter,
    binder: FieldBinder,
    guard: InputGuard,
    session: Option<Session>,
    queue: Rc<RenderQueue>,
    scheduler: Rc<dyn RenderScheduler>,
    root: Option<ElementId>,
}

impl NumpadController {
    /// Build a detached controller. Renders synchronously until
    /// [`with_scheduler`](Self::with_scheduler) installs another scheduler.
    pub fn create(
        host: Rc<dyn FieldHost>,
        discovery: Rc<dyn ElementDiscovery>,
        config: NumpadConfig,
    ) -> Result<Self> {
        config.validate()?;
        let formatter = DisplayFormatter::new(config.decimal_separator);

        Ok(Self {
            binder: FieldBinder::new(host.clone(), discovery, config.clone()),
            guard: InputGuard::new(config.dedup_window(), config.focus_suppression()),
            queue: Rc::new(RenderQueue::new(formatter)),
            scheduler: Rc::new(ImmediateScheduler),
            session: None,
            root: None,
            host,
            config,
            formatter,
        })
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn RenderScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Bind every eligible field under `root` and start watching it.
    /// Returns how many fields were bound.
    pub fn attach(&mut self, root: ElementId) -> Result<usize> {
        let bound = self.binder.scan(root);
        self.binder.observe(root)?;
        self.root = Some(root);
        info!(root = %root, bound, "numpad attached");
        Ok(bound)
    }

    /// Bind fields the watcher reported since the last call.
    pub fn process_mutations(&mut self) -> usize {
        self.binder.process_mutations()
    }

    /// Discard any session, stop watching and publish the closed display.
    pub fn dispose(mut self) {
        self.session = None;
        self.binder.disconnect();
        self.guard.reset();
        // Publish now; a scheduler may never run again
        self.queue.stage(Snapshot::Closed);
        self.queue.flush();
        debug!(root = ?self.root, "numpad disposed");
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Field of the open session.
    pub fn field(&self) -> Option<ElementId> {
        self.session.as_ref().map(|session| session.field)
    }

    pub fn state(&self) -> Option<&ExpressionState> {
        self.session.as_ref().map(|session| &session.state)
    }

    /// Published display; `None` while closed.
    pub fn display(&self) -> Signal<Option<DisplayModel>> {
        self.queue.display()
    }

    pub fn binder(&self) -> &FieldBinder {
        &self.binder
    }

    pub fn config(&self) -> &NumpadConfig {
        &self.config
    }

    // =========================================================================
    // EVENT ENTRY POINT
    // =========================================================================

    /// Handle one host event. Returns `true` when the numpad consumed it and
    /// the host should suppress its default behaviour.
    pub fn handle_event(&mut self, event: HostEvent, at: Instant) -> bool {
        match event {
            HostEvent::Activate { field, channel } => self.activate(field, channel, at),
            HostEvent::Press { key, channel } => {
                if !self.is_open() {
                    return false;
                }
                if self.guard.admit(Action::new(key, channel, at)) {
                    self.perform(key, at);
                }
                true
            }
            HostEvent::Keyboard(event) => {
                if !self.is_open() {
                    return false;
                }
                if let Some(key) = map_key(&event).action_key() {
                    if self.guard.admit(Action::new(key, Channel::Keyboard, at)) {
                        self.perform(key, at);
                    }
                }
                true
            }
            HostEvent::Backdrop => {
                if !self.is_open() {
                    return false;
                }
                self.cancel(at);
                true
            }
        }
    }

    fn activate(&mut self, field: ElementId, channel: Channel, at: Instant) -> bool {
        if !self.binder.wants_numpad(field) {
            return false;
        }
        if self.is_open() {
            debug!(element = %field, "activation while open ignored");
            return true;
        }
        if !self.guard.admit_activation(channel, at) {
            return true;
        }
        if let Err(err) = self.open(field) {
            debug!(element = %field, error = %err, "numpad open skipped");
        }
        true
    }

    fn perform(&mut self, key: ActionKey, at: Instant) {
        match key {
            ActionKey::Keypad(key) => {
                self.key(key);
            }
            ActionKey::Commit => {
                self.commit(at);
            }
            ActionKey::Cancel => self.cancel(at),
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Open a session on `field`. Returns `Ok(false)` when already open.
    pub fn open(&mut self, field: ElementId) -> Result<bool> {
        if self.is_open() {
            debug!(element = %field, "numpad already open");
            return Ok(false);
        }

        let raw = self.host.value(field)?;
        let parsed = self.formatter.parse_field_value(&raw);
        let previous_focus = self.host.active_element();

        info!(element = %field, id = ?self.diagnostic_id(field), "numpad opened");
        self.session = Some(Session {
            field,
            state: ExpressionState::seeded(parsed, raw),
            previous_focus,
        });
        self.render();
        Ok(true)
    }

    /// Apply one keypad key. Returns `false` while closed.
    pub fn key(&mut self, key: NumpadKey) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.state.apply_key(key);
        self.render();
        true
    }

    /// Evaluate, write back, notify and close. `None` while closed.
    pub fn commit(&mut self, at: Instant) -> Option<Committed> {
        let session = self.session.take()?;
        let result = session.state.evaluate();
        let numeral = canonical(result);
        let committed = Committed {
            field: session.field,
            value: self.formatter.format_operand(&numeral),
            numeric: numeral.parse().unwrap_or(result),
        };

        if let Err(err) = self.write_back(&committed) {
            warn!(element = %committed.field, error = %err, "numpad commit write failed");
        }
        self.hand_off_focus(session.field);

        info!(
            element = %committed.field,
            id = ?self.diagnostic_id(committed.field),
            value = %committed.value,
            "numpad committed"
        );
        self.finish(at);
        Some(committed)
    }

    /// Discard the session and give focus back to whoever had it.
    pub fn cancel(&mut self, at: Instant) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Some(previous) = session.previous_focus {
            if let Err(err) = self.host.focus(previous) {
                debug!(element = %previous, error = %err, "focus restore skipped");
            }
        }

        info!(element = %session.field, id = ?self.diagnostic_id(session.field), "numpad cancelled");
        self.finish(at);
    }

    /// Close in the given mode.
    pub fn close(&mut self, mode: CloseMode, at: Instant) {
        match mode {
            CloseMode::Commit => {
                self.commit(at);
            }
            CloseMode::Cancel => self.cancel(at),
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn write_back(&self, committed: &Committed) -> Result<(), HostError> {
        let field = committed.field;
        self.host.set_value(field, &committed.value)?;
        self.host.dispatch(field, FieldNotification::Input)?;
        self.host.dispatch(field, FieldNotification::Change)?;
        self.host.dispatch(
            field,
            FieldNotification::NumericCommit {
                value: committed.value.clone(),
                numeric: committed.numeric,
            },
        )
    }

    /// Move focus off the field so no native keyboard reappears.
    fn hand_off_focus(&self, field: ElementId) {
        let handed = self.host.blur(field).and_then(|()| match self.host.neutral_element() {
            Some(neutral) => self.host.focus(neutral),
            None => Ok(()),
        });
        if let Err(err) = handed {
            warn!(element = %field, error = %err, "numpad focus hand-off failed");
        }
    }

    fn finish(&mut self, at: Instant) {
        self.guard.note_closed(at);
        self.render();
    }

    fn diagnostic_id(&self, field: ElementId) -> Option<String> {
        self.host
            .attribute(field, &self.config.id_attribute)
            .ok()
            .flatten()
    }

    fn render(&self) {
        let snapshot = match &self.session {
            Some(session) => Snapshot::Open {
                field: session.field,
                state: session.state.clone(),
            },
            None => Snapshot::Closed,
        };
        if self.queue.stage(snapshot) {
            let queue = Rc::clone(&self.queue);
            self.scheduler.schedule_render(Box::new(move || queue.flush()));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FocusChange, SyntheticDocument};
    use crate::pipeline::FrameScheduler;
    use crate::types::Operator;
    use std::time::Duration;

    struct Fixture {
        doc: Rc<SyntheticDocument>,
        numpad: NumpadController,
        price: ElementId,
        plain: ElementId,
        t0: Instant,
    }

    fn setup() -> Fixture {
        let doc = Rc::new(SyntheticDocument::new());
        let price = doc
            .append_input(doc.root(), &[("data-numpad", ""), ("data-numpad-id", "price"), ("value", "12,5")])
            .unwrap();
        let plain = doc.append_input(doc.root(), &[("type", "text")]).unwrap();

        let mut numpad =
            NumpadController::create(doc.clone(), doc.clone(), NumpadConfig::default()).unwrap();
        assert_eq!(numpad.attach(doc.root()).unwrap(), 1);

        Fixture { doc, numpad, price, plain, t0: Instant::now() }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_create_rejects_bad_config() {
        let doc = Rc::new(SyntheticDocument::new());
        let config = NumpadConfig { decimal_separator: '+', ..NumpadConfig::default() };
        assert!(NumpadController::create(doc.clone(), doc, config).is_err());
    }

    #[test]
    fn test_open_seeds_from_field() {
        let mut f = setup();
        assert!(f.numpad.open(f.price).unwrap());
        assert_eq!(f.numpad.field(), Some(f.price));
        assert_eq!(f.numpad.state().unwrap().current_operand(), "12.5");

        let model = f.numpad.display().get().unwrap();
        assert_eq!(model.operand, "12,5");
        assert!(!model.ready);
    }

    #[test]
    fn test_open_twice_is_noop() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        f.numpad.key(NumpadKey::Digit(1));
        assert!(!f.numpad.open(f.price).unwrap());
        assert_eq!(f.numpad.state().unwrap().current_operand(), "12.51");
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut f = setup();
        assert!(!f.numpad.key(NumpadKey::Digit(4)));
        assert!(!f.numpad.handle_event(
            HostEvent::Press { key: NumpadKey::Digit(4).into(), channel: Channel::Pointer },
            f.t0,
        ));
        assert!(!f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("4")), f.t0));
        assert_eq!(f.numpad.commit(f.t0), None);
    }

    #[test]
    fn test_activation_of_plain_field_not_consumed() {
        let mut f = setup();
        let event = HostEvent::Activate { field: f.plain, channel: Channel::Pointer };
        assert!(!f.numpad.handle_event(event, f.t0));
        assert!(!f.numpad.is_open());
    }

    #[test]
    fn test_commit_writes_and_notifies() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        f.numpad.key(NumpadKey::Operator(Operator::Multiply));
        f.numpad.key(NumpadKey::Digit(2));

        let committed = f.numpad.commit(f.t0).unwrap();
        assert_eq!(committed.value, "25");
        assert_eq!(committed.numeric, 25.0);
        assert_eq!(f.doc.value(f.price).unwrap(), "25");
        assert_eq!(
            f.doc.notifications_for(f.price),
            vec![
                FieldNotification::Input,
                FieldNotification::Change,
                FieldNotification::NumericCommit { value: "25".into(), numeric: 25.0 },
            ]
        );
        assert!(!f.numpad.is_open());
        assert_eq!(f.numpad.display().get(), None);
    }

    #[test]
    fn test_commit_hands_focus_to_neutral_element() {
        let mut f = setup();
        f.doc.focus(f.price).unwrap();
        f.numpad.open(f.price).unwrap();
        f.numpad.commit(f.t0);

        assert_eq!(f.doc.active_element(), Some(f.doc.root()));
        let log = f.doc.focus_log();
        assert_eq!(
            &log[log.len() - 2..],
            &[FocusChange::Blur(f.price), FocusChange::Focus(f.doc.root())]
        );
    }

    #[test]
    fn test_cancel_discards_and_restores_focus() {
        let mut f = setup();
        f.doc.focus(f.plain).unwrap();
        f.numpad.open(f.price).unwrap();
        f.numpad.key(NumpadKey::Digit(9));

        assert!(f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("Escape")), f.t0));
        assert!(!f.numpad.is_open());
        assert_eq!(f.doc.value(f.price).unwrap(), "12,5");
        assert!(f.doc.notifications().is_empty());
        assert_eq!(f.doc.active_element(), Some(f.plain));
    }

    #[test]
    fn test_backdrop_cancels() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        assert!(f.numpad.handle_event(HostEvent::Backdrop, f.t0));
        assert!(!f.numpad.is_open());
        assert!(!f.numpad.handle_event(HostEvent::Backdrop, f.t0 + ms(5)));
    }

    #[test]
    fn test_keyboard_swallowed_while_open() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        assert!(f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("q")), f.t0));
        assert!(f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("Tab")), f.t0));
        assert_eq!(f.numpad.state().unwrap().current_operand(), "12.5");
        assert!(f.numpad.is_open());
    }

    #[test]
    fn test_enter_commits() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("Delete")), f.t0);
        f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("7")), f.t0 + ms(1));
        f.numpad.handle_event(HostEvent::Keyboard(KeyboardEvent::new("Enter")), f.t0 + ms(2));
        assert_eq!(f.doc.value(f.price).unwrap(), "7");
    }

    #[test]
    fn test_activation_suppressed_right_after_commit() {
        let mut f = setup();
        let focus = HostEvent::Activate { field: f.price, channel: Channel::Focus };
        assert!(f.numpad.handle_event(focus.clone(), f.t0));
        f.numpad.commit(f.t0 + ms(10));

        assert!(f.numpad.handle_event(focus.clone(), f.t0 + ms(50)));
        assert!(!f.numpad.is_open());

        let tap = HostEvent::Activate { field: f.price, channel: Channel::Pointer };
        f.numpad.handle_event(tap, f.t0 + ms(60));
        assert!(f.numpad.is_open());
    }

    #[test]
    fn test_open_on_detached_field_fails() {
        let mut f = setup();
        f.doc.remove(f.price).unwrap();
        assert!(f.numpad.open(f.price).is_err());
        let event = HostEvent::Activate { field: f.price, channel: Channel::Pointer };
        assert!(f.numpad.handle_event(event, f.t0));
        assert!(!f.numpad.is_open());
    }

    #[test]
    fn test_commit_survives_detached_field() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        f.doc.remove(f.price).unwrap();
        let committed = f.numpad.commit(f.t0).unwrap();
        assert_eq!(committed.value, "12,5");
        assert!(!f.numpad.is_open());
    }

    #[test]
    fn test_frame_scheduler_coalesces_renders() {
        let doc = Rc::new(SyntheticDocument::new());
        let field = doc.append_input(doc.root(), &[("data-numpad", "")]).unwrap();
        let frames = Rc::new(FrameScheduler::new());
        let mut numpad = NumpadController::create(doc.clone(), doc.clone(), NumpadConfig::default())
            .unwrap()
            .with_scheduler(frames.clone());
        numpad.attach(doc.root()).unwrap();

        numpad.open(field).unwrap();
        numpad.key(NumpadKey::Digit(4));
        numpad.key(NumpadKey::Digit(2));
        assert_eq!(frames.pending(), 1);
        assert_eq!(numpad.display().get(), None);

        frames.run_frame();
        assert_eq!(numpad.display().get().unwrap().operand, "42");
    }

    #[test]
    fn test_late_field_bound_after_mutations() {
        let mut f = setup();
        let late = f.doc.append_input(f.doc.root(), &[("inputmode", "decimal")]).unwrap();
        assert_eq!(f.numpad.process_mutations(), 1);
        assert!(f.numpad.binder().wants_numpad(late));
    }

    #[test]
    fn test_dispose_disconnects() {
        let mut f = setup();
        f.numpad.open(f.price).unwrap();
        let display = f.numpad.display();
        f.numpad.dispose();
        assert!(!f.doc.is_observing());
        assert_eq!(display.get(), None);
    }
}
