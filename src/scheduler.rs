//! Timer abstraction with an explicit clock.
//!
//! Time only moves when the owner calls [`TimerQueue::pop_due`] or
//! [`TimerQueue::advance_to`], which keeps animation and dismissal timing
//! deterministic under test.

use crate::models::NotificationId;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    CounterTick { element: String },
    BeginDismiss(NotificationId),
    RemoveNotification(NotificationId),
}

pub trait Scheduler: Send {
    fn now(&self) -> Duration;
    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId;
    /// Fires `task` every `period` until cancelled; the first run is one period out.
    fn schedule_every(&mut self, period: Duration, task: Task) -> TimerId;
    fn cancel(&mut self, id: TimerId) -> bool;
}

#[derive(Debug)]
struct Timer {
    task: Task,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), Timer>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Periodic timers are re-armed under the same id.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, Task)> {
        let (&(deadline, id), _) = self.timers.iter().next()?;
        if deadline > until {
            return None;
        }
        let timer = self.timers.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);

        if let Some(period) = timer.period {
            self.insert(id, self.now + period, timer.task.clone(), Some(period));
        }

        Some((id, timer.task))
    }

    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, id: TimerId, deadline: Duration, task: Task, period: Option<Duration>) {
        self.timers.insert((deadline, id), Timer { task, period });
        self.deadlines.insert(id, deadline);
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        let id = self.allocate();
        self.insert(id, self.now + delay, task, None);
        id
    }

    fn schedule_every(&mut self, period: Duration, task: Task) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = self.allocate();
        self.insert(id, self.now + period, task, Some(period));
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.timers.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }
}
