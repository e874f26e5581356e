//! State Module - Input state behind the overlay
//!
//! - **Guard** - De-duplication and post-close focus suppression
//! - **Keyboard** - Event types and the numpad key map
//! - **Mouse** - Mouse event types
//! - **Input** - crossterm conversion, polling and routing

pub mod guard;
pub mod input;
mod keyboard;
mod mouse;

pub use guard::{Action, InputGuard};
pub use keyboard::*;
pub use mouse::*;
