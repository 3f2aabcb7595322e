//! Ephemeral toast queue.
//!
//! Every shown notification schedules its own removal after the configured
//! lifetime. Listeners see the full queue after each change, and a
//! [`NotificationSink`] mirrors entries to the desktop once permission has
//! been granted.

use crate::delay::Scheduler;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_DESKTOP_TITLE: &str = "MediSync Alert";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub title: Option<String>,
    pub created_at: String,
}

/// Desktop notification permission as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DesktopPermission {
    #[default]
    Default,
    Granted,
    Denied,
    Unsupported,
}

pub trait NotificationSink {
    fn mirror(&self, notification: &Notification);
}

pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn mirror(&self, _notification: &Notification) {}
}

type Listener = Box<dyn Fn(&[Notification])>;

#[derive(Default)]
struct Queue {
    entries: RefCell<Vec<Notification>>,
    listeners: RefCell<Vec<Listener>>,
}

impl Queue {
    fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        };
        if removed {
            self.publish();
        }
        removed
    }

    fn publish(&self) {
        let snapshot = self.entries.borrow().clone();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }
}

#[derive(Clone)]
pub struct NotificationCenter {
    queue: Rc<Queue>,
    scheduler: Rc<dyn Scheduler>,
    sink: Rc<dyn NotificationSink>,
    permission: Rc<Cell<DesktopPermission>>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(
        ttl: Duration,
        scheduler: Rc<dyn Scheduler>,
        sink: Rc<dyn NotificationSink>,
    ) -> Self {
        Self {
            queue: Rc::new(Queue::default()),
            scheduler,
            sink,
            permission: Rc::new(Cell::new(DesktopPermission::Default)),
            ttl,
        }
    }

    /// Appends a toast and returns its id. Removal is scheduled immediately.
    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        title: Option<String>,
    ) -> String {
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            severity,
            title,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let id = notification.id.clone();

        if self.permission.get() == DesktopPermission::Granted {
            self.sink.mirror(&notification);
        }
        self.queue.entries.borrow_mut().push(notification);
        self.queue.publish();

        let weak = Rc::downgrade(&self.queue);
        let expired = id.clone();
        self.scheduler.schedule(
            self.ttl,
            Box::new(move || {
                if let Some(queue) = weak.upgrade() {
                    queue.remove(&expired);
                }
            }),
        );
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, Severity::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(message, Severity::Error, None)
    }

    /// Removing an id that is not queued does nothing.
    pub fn remove(&self, id: &str) {
        self.queue.remove(id);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.queue.entries.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&[Notification]) + 'static) {
        self.queue.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn permission(&self) -> DesktopPermission {
        self.permission.get()
    }

    pub fn set_permission(&self, permission: DesktopPermission) {
        self.permission.set(permission);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::ManualScheduler;

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<String>>);

    impl NotificationSink for RecordingSink {
        fn mirror(&self, notification: &Notification) {
            self.0.borrow_mut().push(
                notification
                    .title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DESKTOP_TITLE.to_owned()),
            );
        }
    }

    fn center(scheduler: &ManualScheduler, sink: Rc<RecordingSink>) -> NotificationCenter {
        NotificationCenter::new(Duration::from_secs(5), Rc::new(scheduler.clone()), sink)
    }

    #[test]
    fn notifications_expire_after_ttl() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler, Rc::new(RecordingSink::default()));

        center.show("Patient admitted", Severity::Success, None);
        center.show("Bed shortage", Severity::Warning, Some("Central".into()));
        assert_eq!(center.notifications().len(), 2);
        assert_eq!(
            scheduler.pending_delays(),
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );

        scheduler.run_all();
        assert!(center.notifications().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler, Rc::new(RecordingSink::default()));
        let id = center.show("x", Severity::Info, None);

        center.remove(&id);
        center.remove(&id);
        center.remove("never-existed");
        assert!(center.notifications().is_empty());

        // The pending expiry for the removed id is harmless.
        scheduler.run_all();
        assert!(center.notifications().is_empty());
    }

    #[test]
    fn insertion_order_is_kept() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler, Rc::new(RecordingSink::default()));
        let a = center.show("a", Severity::Info, None);
        let b = center.error("b");
        let ids: Vec<_> = center.notifications().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn listeners_see_every_change() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler, Rc::new(RecordingSink::default()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        center.subscribe(move |queue| s.borrow_mut().push(queue.len()));

        let id = center.success("saved");
        center.show("again", Severity::Info, None);
        center.remove(&id);
        center.remove(&id);
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn desktop_mirroring_requires_permission() {
        let scheduler = ManualScheduler::new();
        let sink = Rc::new(RecordingSink::default());
        let center = center(&scheduler, sink.clone());

        center.show("quiet", Severity::Info, None);
        assert!(sink.0.borrow().is_empty());

        center.set_permission(DesktopPermission::Granted);
        center.show("loud", Severity::Error, None);
        center.show("titled", Severity::Error, Some("Code Blue".into()));
        assert_eq!(
            *sink.0.borrow(),
            vec![DEFAULT_DESKTOP_TITLE.to_owned(), "Code Blue".to_owned()]
        );
    }

    #[test]
    fn expiry_after_center_dropped_is_a_no_op() {
        let scheduler = ManualScheduler::new();
        {
            let center = center(&scheduler, Rc::new(RecordingSink::default()));
            center.show("bye", Severity::Info, None);
        }
        assert_eq!(scheduler.run_all(), 1);
    }
}
