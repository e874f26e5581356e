//! Layout Module - Overlay geometry computed with Taffy.
//!
//! # Example
//!
//! ```ignore
//! use spark_numpad::layout::{centered_origin, compute_keypad_layout};
//!
//! let (x, y) = centered_origin(80, 24, 29, 15);
//! let keypad = compute_keypad_layout(x, y, 29, 15)?;
//! let key = keypad.hit_test(column, row);
//! ```

mod keypad;

pub use keypad::*;
