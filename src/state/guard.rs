//! Input Arbitration Guard - One logical action per physical press.
//!
//! Touch browsers report a single tap as `pointerdown`, `touchstart`,
//! `mousedown` and `click`; a field can also receive `focus` from a genuine tap
//! or from our own focus handoff after a commit. The guard resolves both:
//!
//! - **De-duplication**: the same [`ActionKey`] arriving on a *different*
//!   [`Channel`] inside the window is dropped. Same-channel repeats pass, so
//!   fast taps on one button are all honoured.
//! - **Post-close suppression**: right after the overlay closes, non-explicit
//!   activations (focus, click, programmatic) are refused. A fresh pointer-down
//!   or touch-start always passes and ends the suppression.
//!
//! Whenever the recorded state cannot be interpreted (timestamps running
//! backwards), the guard admits the input.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::{ActionKey, Channel};

/// One press as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub key: ActionKey,
    pub channel: Channel,
    pub at: Instant,
}

impl Action {
    pub fn new(key: impl Into<ActionKey>, channel: Channel, at: Instant) -> Self {
        Self { key: key.into(), channel, at }
    }
}

#[derive(Debug, Clone, Copy)]
struct Admitted {
    channel: Channel,
    at: Instant,
}

#[derive(Debug)]
pub struct InputGuard {
    dedup_window: Duration,
    suppression_window: Duration,
    last_admitted: HashMap<ActionKey, Admitted>,
    closed_at: Option<Instant>,
}

impl InputGuard {
    pub fn new(dedup_window: Duration, suppression_window: Duration) -> Self {
        Self {
            dedup_window,
            suppression_window,
            last_admitted: HashMap::new(),
            closed_at: None,
        }
    }

    // =========================================================================
    // DE-DUPLICATION
    // =========================================================================

    /// Decide whether a press should reach the engine.
    pub fn admit(&mut self, action: Action) -> bool {
        if let Some(previous) = self.last_admitted.get(&action.key) {
            if previous.channel != action.channel {
                if let Some(elapsed) = action.at.checked_duration_since(previous.at) {
                    if elapsed < self.dedup_window {
                        debug!(key = ?action.key, channel = ?action.channel, "duplicate press dropped");
                        return false;
                    }
                }
            }
        }

        self.last_admitted.insert(
            action.key,
            Admitted { channel: action.channel, at: action.at },
        );
        true
    }

    // =========================================================================
    // FOCUS SUPPRESSION
    // =========================================================================

    /// Arm suppression; called whenever the overlay closes.
    pub fn note_closed(&mut self, at: Instant) {
        self.closed_at = Some(at);
        // A new session starts with a clean slate
        self.last_admitted.clear();
    }

    /// Decide whether an activation of a field may open the overlay.
    pub fn admit_activation(&mut self, channel: Channel, at: Instant) -> bool {
        let Some(closed_at) = self.closed_at else {
            return true;
        };

        if channel.is_explicit_press() {
            self.closed_at = None;
            return true;
        }

        match at.checked_duration_since(closed_at) {
            Some(elapsed) if elapsed < self.suppression_window => {
                debug!(channel = ?channel, "activation suppressed after close");
                false
            }
            _ => {
                self.closed_at = None;
                true
            }
        }
    }

    pub fn is_suppressing(&self, at: Instant) -> bool {
        self.closed_at
            .and_then(|closed_at| at.checked_duration_since(closed_at))
            .is_some_and(|elapsed| elapsed < self.suppression_window)
    }

    /// Forget everything (dispose / tests).
    pub fn reset(&mut self) {
        self.last_admitted.clear();
        self.closed_at = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumpadKey;

    const SEVEN: ActionKey = ActionKey::Keypad(NumpadKey::Digit(7));

    fn setup() -> (InputGuard, Instant) {
        (
            InputGuard::new(Duration::from_millis(120), Duration::from_millis(250)),
            Instant::now(),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pointerdown_then_click_is_one_press() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        assert!(!guard.admit(Action::new(SEVEN, Channel::Mouse, t0 + ms(30))));
    }

    #[test]
    fn test_three_channels_one_tap() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Touch, t0)));
        assert!(!guard.admit(Action::new(SEVEN, Channel::Pointer, t0 + ms(5))));
        assert!(!guard.admit(Action::new(SEVEN, Channel::Mouse, t0 + ms(60))));
    }

    #[test]
    fn test_same_channel_repeats_pass() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0 + ms(40))));
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0 + ms(80))));
    }

    #[test]
    fn test_fast_tap_then_its_click() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        assert!(!guard.admit(Action::new(SEVEN, Channel::Mouse, t0 + ms(5))));
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0 + ms(80))));
        assert!(!guard.admit(Action::new(SEVEN, Channel::Mouse, t0 + ms(85))));
    }

    #[test]
    fn test_other_channel_after_window_passes() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        assert!(guard.admit(Action::new(SEVEN, Channel::Keyboard, t0 + ms(200))));
    }

    #[test]
    fn test_different_keys_are_independent() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        assert!(guard.admit(Action::new(ActionKey::Commit, Channel::Mouse, t0 + ms(10))));
    }

    #[test]
    fn test_backwards_clock_admits() {
        let (mut guard, t0) = setup();
        let later = t0 + ms(500);
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, later)));
        assert!(guard.admit(Action::new(SEVEN, Channel::Mouse, t0)));
    }

    #[test]
    fn test_focus_suppressed_after_close() {
        let (mut guard, t0) = setup();
        assert!(guard.admit_activation(Channel::Focus, t0));

        guard.note_closed(t0);
        assert!(guard.is_suppressing(t0 + ms(10)));
        assert!(!guard.admit_activation(Channel::Focus, t0 + ms(10)));
        assert!(!guard.admit_activation(Channel::Mouse, t0 + ms(20)));
        assert!(guard.admit_activation(Channel::Focus, t0 + ms(300)));
    }

    #[test]
    fn test_explicit_press_bypasses_suppression() {
        let (mut guard, t0) = setup();
        guard.note_closed(t0);
        assert!(guard.admit_activation(Channel::Pointer, t0 + ms(10)));
        // Suppression ended with the explicit press
        assert!(guard.admit_activation(Channel::Focus, t0 + ms(20)));
    }

    #[test]
    fn test_close_clears_press_history() {
        let (mut guard, t0) = setup();
        assert!(guard.admit(Action::new(SEVEN, Channel::Pointer, t0)));
        guard.note_closed(t0 + ms(1));
        assert!(guard.admit(Action::new(SEVEN, Channel::Mouse, t0 + ms(2))));
    }
}
