//! # spark-numpad
//!
//! Modal numeric-entry calculator overlay for Rust UIs.
//!
//! Fields that opt in are made read-only; activating one opens a keypad where
//! the user builds a simple arithmetic expression (`+ - × ÷ %`, multiplicative
//! before additive). Confirming writes a single locale-formatted number back
//! into the field and notifies the host.
//!
//! ## Architecture
//!
//! ```text
//! host events → InputGuard → NumpadController → ExpressionState
//!                                   │
//!                                   └→ RenderQueue → Signal<Option<DisplayModel>> → renderer
//! ```
//!
//! The host document is abstracted behind [`host::FieldHost`] and
//! [`host::ElementDiscovery`]; [`host::SyntheticDocument`] implements both in
//! memory. Display updates are published through a
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) signal.
//!
//! ## Modules
//!
//! - [`types`] - Keys, operators, channels, element ids
//! - [`engine`] - Expression state and evaluation
//! - [`display`] - Locale formatting and the display model
//! - [`binder`] - Field discovery and binding
//! - [`state`] - Input guard, keyboard/mouse events, crossterm input
//! - [`overlay`] - The controller state machine
//! - [`pipeline`] - Render scheduling
//! - [`layout`] - Keypad geometry (Taffy)
//! - [`renderer`] - Terminal output (crossterm)

pub mod binder;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod host;
pub mod layout;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use binder::{BindOutcome, FieldBinder, FieldFlags};
pub use config::NumpadConfig;
pub use display::{DisplayFormatter, DisplayModel};
pub use engine::{evaluate_parts, ExpressionState, Part};
pub use error::{HostError, NumpadError, Result};
pub use host::{ElementDiscovery, FieldHost, FieldNotification, Mutation, SyntheticDocument};
pub use layout::{compute_keypad_layout, KeypadLayout};
pub use overlay::{CloseMode, Committed, HostEvent, NumpadController};
pub use pipeline::{FrameScheduler, ImmediateScheduler, RenderScheduler};
pub use renderer::TerminalRenderer;
pub use state::{map_key, InputGuard, KeyCommand, KeyboardEvent, Modifiers};
