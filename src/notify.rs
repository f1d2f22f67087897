use crate::config::Timings;
use crate::document::Document;
use crate::models::{Notification, NotificationId, NotificationPhase, Severity};
use crate::scheduler::{Scheduler, Task};
use chrono::Local;
use std::time::Duration;
use tracing::{debug, info};

/// Transient status messages, each on its own dismissal timers.
#[derive(Debug)]
pub struct NotificationQueue {
    visible_for: Duration,
    exit_for: Duration,
    next_id: u64,
    live: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new(timings: &Timings) -> Self {
        Self {
            visible_for: timings.notification_visible,
            exit_for: timings.notification_exit,
            next_id: 0,
            live: Vec::new(),
        }
    }

    pub fn notify(
        &mut self,
        document: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        message: impl Into<String>,
        severity: Severity,
    ) -> NotificationId {
        self.next_id += 1;
        let notification = Notification {
            id: NotificationId(self.next_id),
            message: message.into(),
            severity,
            created_at: Local::now(),
            shown_at: scheduler.now(),
            phase: NotificationPhase::Visible,
        };
        info!(severity = severity.as_str(), message = %notification.message, "notification");

        document.mount_notification(&notification);
        scheduler.schedule(self.visible_for, Task::BeginDismiss(notification.id));
        let id = notification.id;
        self.live.push(notification);
        id
    }

    /// Starts the exit animation and schedules removal once it has played.
    pub fn begin_dismiss(
        &mut self,
        document: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        id: NotificationId,
    ) {
        let Some(notification) = self.live.iter_mut().find(|n| n.id == id) else {
            return;
        };
        notification.phase = NotificationPhase::Dismissing;
        document.mark_dismissing(id);
        scheduler.schedule(self.exit_for, Task::RemoveNotification(id));
    }

    pub fn remove(&mut self, document: &mut dyn Document, id: NotificationId) {
        self.live.retain(|n| n.id != id);
        if document.remove_notification(id) {
            debug!(id = id.0, "notification dismissed");
        }
    }

    pub fn live(&self) -> &[Notification] {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::scheduler::TimerQueue;

    fn pump(
        queue: &mut NotificationQueue,
        document: &mut PageDocument,
        timers: &mut TimerQueue,
        until_ms: u64,
    ) {
        let until = Duration::from_millis(until_ms);
        while let Some((_, task)) = timers.pop_due(until) {
            match task {
                Task::BeginDismiss(id) => queue.begin_dismiss(document, timers, id),
                Task::RemoveNotification(id) => queue.remove(document, id),
                Task::CounterTick { .. } => {}
            }
        }
        timers.advance_to(until);
    }

    #[test]
    fn error_notification_lives_for_visible_plus_exit() {
        let mut queue = NotificationQueue::new(&Timings::default());
        let mut document = PageDocument::default();
        let mut timers = TimerQueue::new();

        queue.notify(&mut document, &mut timers, "x", Severity::Error);
        let mounted = document.notifications();
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].class_name, "notification notification-error");
        assert_eq!(mounted[0].icon, "exclamation-circle");

        pump(&mut queue, &mut document, &mut timers, 2999);
        assert!(!document.notifications()[0].exiting);

        pump(&mut queue, &mut document, &mut timers, 3000);
        assert!(document.notifications()[0].exiting);
        assert_eq!(queue.live()[0].phase, NotificationPhase::Dismissing);

        pump(&mut queue, &mut document, &mut timers, 3299);
        assert_eq!(document.notifications().len(), 1);

        pump(&mut queue, &mut document, &mut timers, 3300);
        assert!(document.notifications().is_empty());
        assert!(queue.live().is_empty());
    }

    #[test]
    fn overlapping_notifications_expire_independently() {
        let mut queue = NotificationQueue::new(&Timings::default());
        let mut document = PageDocument::default();
        let mut timers = TimerQueue::new();

        queue.notify(&mut document, &mut timers, "saved", Severity::Success);
        pump(&mut queue, &mut document, &mut timers, 1000);
        queue.notify(&mut document, &mut timers, "saved", Severity::Success);
        assert_eq!(document.notifications().len(), 2);
        assert_eq!(document.notifications()[0].icon, "check-circle");

        pump(&mut queue, &mut document, &mut timers, 3300);
        assert_eq!(document.notifications().len(), 1);
        pump(&mut queue, &mut document, &mut timers, 4300);
        assert!(document.notifications().is_empty());
    }
}
