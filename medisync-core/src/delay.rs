//! Timer seams for the simulated network calls and toast expiry.
//!
//! The core never touches a runtime directly: the browser shell plugs in
//! `setTimeout`-backed implementations, tests plug in [`NoDelay`] and
//! [`ManualScheduler`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Suspends the caller for a while. Stands in for network latency.
pub trait Delay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Resolves immediately regardless of the requested duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

/// Runs a callback once after a duration. Used for fire-and-forget expiry.
pub trait Scheduler {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>);
}

/// Records scheduled tasks and runs them only when told to.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Durations of every pending task, in scheduling order.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending.borrow().iter().map(|(d, _)| *d).collect()
    }

    /// Runs every pending task. Tasks scheduled while running stay pending.
    pub fn run_all(&self) -> usize {
        let tasks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((after, task));
    }
}
