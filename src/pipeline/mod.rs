//! Render Pipeline
//!
//! ```text
//! controller → RenderQueue::stage → RenderScheduler → RenderQueue::flush → Signal<Option<DisplayModel>> → renderer
//! ```
//!
//! The controller stages snapshots; the scheduler decides when the single
//! pending flush runs; the flush projects the snapshot and publishes it.
//! Front ends subscribe to the signal (an `effect` in the terminal demo).

mod render_queue;
mod scheduler;

pub use render_queue::{RenderQueue, Snapshot};
pub use scheduler::{FrameScheduler, ImmediateScheduler, RenderJob, RenderScheduler};
