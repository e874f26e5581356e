//! Render Queue - Coalesces display updates into at most one pending render.
//!
//! Every state change stages a [`Snapshot`]. Only the first stage after a
//! flush asks for a render; later stages overwrite the staged snapshot, so the
//! render that eventually runs shows the latest state. The projected
//! [`DisplayModel`] is published through a signal, `None` while closed.
//!
//! # Example
//!
//! ```ignore
//! let queue = Rc::new(RenderQueue::new(DisplayFormatter::new(',')));
//! if queue.stage(Snapshot::Open { field, state }) {
//!     let queue = queue.clone();
//!     scheduler.schedule_render(Box::new(move || queue.flush()));
//! }
//! ```

use std::cell::{Cell, RefCell};

use spark_signals::{signal, Signal};

use crate::display::{DisplayFormatter, DisplayModel};
use crate::engine::ExpressionState;
use crate::types::ElementId;

/// State to render on the next flush.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Open { field: ElementId, state: ExpressionState },
    Closed,
}

pub struct RenderQueue {
    formatter: DisplayFormatter,
    pending: Cell<bool>,
    staged: RefCell<Option<Snapshot>>,
    display: Signal<Option<DisplayModel>>,
    renders: Cell<usize>,
}

impl RenderQueue {
    pub fn new(formatter: DisplayFormatter) -> Self {
        Self {
            formatter,
            pending: Cell::new(false),
            staged: RefCell::new(None),
            display: signal(None),
            renders: Cell::new(0),
        }
    }

    /// Stage the latest snapshot. Returns `true` when a render must be scheduled.
    pub fn stage(&self, snapshot: Snapshot) -> bool {
        *self.staged.borrow_mut() = Some(snapshot);
        !self.pending.replace(true)
    }

    /// Project the staged snapshot and publish it.
    pub fn flush(&self) {
        self.pending.set(false);
        let Some(snapshot) = self.staged.borrow_mut().take() else {
            return;
        };

        let model = match snapshot {
            Snapshot::Open { field, state } => {
                Some(DisplayModel::project(&self.formatter, field, &state))
            }
            Snapshot::Closed => None,
        };
        self.display.set(model);
        self.renders.set(self.renders.get() + 1);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Published display; `None` while the overlay is closed.
    pub fn display(&self) -> Signal<Option<DisplayModel>> {
        self.display.clone()
    }

    /// Flushes that published something.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }
}
