//! Render Scheduling - When staged display snapshots reach the screen.
//!
//! The controller never draws directly. It hands a job to a
//! [`RenderScheduler`]; the host decides when the job runs.
//!
//! - [`ImmediateScheduler`] runs jobs synchronously (tests, headless hosts)
//! - [`FrameScheduler`] queues jobs until the host's frame tick calls
//!   [`FrameScheduler::run_frame`]

use std::cell::RefCell;

/// Deferred render work.
pub type RenderJob = Box<dyn FnOnce()>;

pub trait RenderScheduler {
    fn schedule_render(&self, job: RenderJob);
}

/// Runs every job as soon as it is scheduled.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl RenderScheduler for ImmediateScheduler {
    fn schedule_render(&self, job: RenderJob) {
        job();
    }
}

/// Holds jobs until the next frame.
#[derive(Default)]
pub struct FrameScheduler {
    queue: RefCell<Vec<RenderJob>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every queued job. Jobs scheduled while running wait for the next frame.
    pub fn run_frame(&self) -> usize {
        let jobs = std::mem::take(&mut *self.queue.borrow_mut());
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

impl RenderScheduler for FrameScheduler {
    fn schedule_render(&self, job: RenderJob) {
        self.queue.borrow_mut().push(job);
    }
}
