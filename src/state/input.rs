//! Input Module - Event conversion, polling and routing
//!
//! Bridges crossterm's event system with the numpad's host events.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Translate a terminal event into a [`HostEvent`] for an open overlay
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_numpad::state::input::{poll_event, route_event};
//! use std::time::{Duration, Instant};
//!
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         if let Some(host_event) = route_event(&event, &keypad) {
//!             controller.handle_event(host_event, Instant::now());
//!         }
//!     }
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyEventKind, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
    MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
    poll, read,
    EnableMouseCapture, DisableMouseCapture,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{KeyboardEvent, KeyState, Modifiers};
use super::mouse::{MouseAction, MouseButton, MouseEvent};
use crate::layout::KeypadLayout;
use crate::overlay::HostEvent;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Terminal event after conversion
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Mouse event (click, scroll, move, etc.)
    Mouse(MouseEvent),
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Mouse(mouse) => Ok(InputEvent::Mouse(convert_mouse_event(mouse))),
        CrosstermEvent::Key(key) => Ok(InputEvent::Key(convert_key_event(key))),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Translate a terminal event into a host event while the overlay is open.
///
/// Keys pass through untouched. A primary button-down on a keypad button is
/// a press; a button-down outside the panel is a backdrop tap. Releases and
/// clicks in the gaps between buttons do nothing.
pub fn route_event(event: &InputEvent, keypad: &KeypadLayout) -> Option<HostEvent> {
    match event {
        InputEvent::Key(key) => Some(HostEvent::Keyboard(key.clone())),
        InputEvent::Mouse(mouse) => {
            let channel = mouse.press_channel()?;
            if let Some(key) = keypad.hit_test(mouse.x, mouse.y) {
                Some(HostEvent::Press { key, channel })
            } else if !keypad.contains(mouse.x, mouse.y) {
                Some(HostEvent::Backdrop)
            } else {
                None
            }
        }
        InputEvent::Resize(..) | InputEvent::None => None,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_keypad_layout;
    use crate::types::{ActionKey, Channel, NumpadKey};
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_convert_mouse_down() {
        let event = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5));

        assert_eq!(event.action, MouseAction::Down);
        assert_eq!(event.button, MouseButton::Left);
        assert_eq!(event.x, 10);
        assert_eq!(event.y, 5);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_mouse_up_right() {
        let event = convert_mouse_event(mouse(MouseEventKind::Up(CrosstermMouseButton::Right), 20, 15));
        assert_eq!(event.action, MouseAction::Up);
        assert_eq!(event.button, MouseButton::Right);
    }

    #[test]
    fn test_convert_mouse_scroll_and_move() {
        let event = convert_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(event.action, MouseAction::Scroll);
        assert_eq!(event.button, MouseButton::None);

        let event = convert_mouse_event(mouse(MouseEventKind::Moved, 30, 20));
        assert_eq!(event.action, MouseAction::Move);
        assert_eq!((event.x, event.y), (30, 20));
    }

    #[test]
    fn test_convert_key_char() {
        let event = convert_key_event(key(KeyCode::Char('7'), KeyModifiers::empty(), KeyEventKind::Press));
        assert_eq!(event.key, "7");
        assert_eq!(event.state, KeyState::Press);
    }

    #[test]
    fn test_convert_key_editing() {
        let keys = [
            (KeyCode::Enter, "Enter"),
            (KeyCode::Backspace, "Backspace"),
            (KeyCode::Delete, "Delete"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::Tab, "Tab"),
            (KeyCode::F(5), ""),
        ];

        for (code, expected) in keys {
            let event = convert_key_event(key(code, KeyModifiers::empty(), KeyEventKind::Press));
            assert_eq!(event.key, expected);
        }
    }

    #[test]
    fn test_convert_key_modifiers_and_states() {
        let event = convert_key_event(key(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            KeyEventKind::Release,
        ));
        assert!(event.modifiers.ctrl);
        assert!(event.modifiers.shift);
        assert!(!event.modifiers.alt);
        assert_eq!(event.state, KeyState::Release);

        let event = convert_key_event(key(KeyCode::Char('1'), KeyModifiers::empty(), KeyEventKind::Repeat));
        assert_eq!(event.state, KeyState::Repeat);
    }

    #[test]
    fn test_route_key_passes_through() {
        let keypad = compute_keypad_layout(0, 0, 29, 15).unwrap();
        let event = InputEvent::Key(KeyboardEvent::new("7"));
        assert_eq!(
            route_event(&event, &keypad),
            Some(HostEvent::Keyboard(KeyboardEvent::new("7")))
        );
    }

    #[test]
    fn test_route_click_on_button() {
        let keypad = compute_keypad_layout(0, 0, 29, 15).unwrap();
        let seven = keypad
            .buttons()
            .iter()
            .find(|b| b.key == ActionKey::Keypad(NumpadKey::Digit(7)))
            .unwrap();
        let (x, y) = seven.center();

        let down = InputEvent::Mouse(MouseEvent::down(MouseButton::Left, x, y));
        assert_eq!(
            route_event(&down, &keypad),
            Some(HostEvent::Press { key: seven.key, channel: Channel::Pointer })
        );

        // The release of the same click is not a second press
        let up = InputEvent::Mouse(MouseEvent::up(MouseButton::Left, x, y));
        assert_eq!(route_event(&up, &keypad), None);
    }

    #[test]
    fn test_route_outside_is_backdrop() {
        let keypad = compute_keypad_layout(10, 5, 29, 15).unwrap();
        let down = InputEvent::Mouse(MouseEvent::down(MouseButton::Left, 0, 0));
        assert_eq!(route_event(&down, &keypad), Some(HostEvent::Backdrop));

        let up = InputEvent::Mouse(MouseEvent::up(MouseButton::Left, 0, 0));
        assert_eq!(route_event(&up, &keypad), None);

        assert_eq!(route_event(&InputEvent::Resize(80, 24), &keypad), None);
    }
}
