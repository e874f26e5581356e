//! Renderer Module - Terminal output for the overlay.
//!
//! # Example
//!
//! ```ignore
//! use spark_numpad::renderer::TerminalRenderer;
//!
//! let renderer = TerminalRenderer::new(',');
//! renderer.draw(&mut std::io::stdout(), &model, &keypad)?;
//! ```

mod terminal;

pub use terminal::TerminalRenderer;
