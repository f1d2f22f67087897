use crate::config::Timings;
use crate::document::Document;
use crate::scheduler::{Scheduler, Task, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
struct Animation {
    target: u64,
    current: f64,
    increment: f64,
    ticks: u32,
    total_ticks: u32,
    timer: TimerId,
}

/// Count-up animations keyed by the element they render into.
///
/// At most one animation runs per element: starting a new one cancels the
/// timer of the previous one first.
#[derive(Debug)]
pub struct CounterBank {
    duration: Duration,
    tick: Duration,
    running: HashMap<String, Animation>,
}

impl CounterBank {
    pub fn new(timings: &Timings) -> Self {
        Self {
            duration: timings.counter_duration,
            tick: timings.counter_tick,
            running: HashMap::new(),
        }
    }

    pub fn animate(
        &mut self,
        document: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        element: &str,
        target: u64,
    ) {
        self.animate_for(document, scheduler, element, target, self.duration);
    }

    pub fn animate_for(
        &mut self,
        document: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        element: &str,
        target: u64,
        duration: Duration,
    ) {
        if !document.contains(element) {
            return;
        }
        if let Some(previous) = self.running.remove(element) {
            scheduler.cancel(previous.timer);
            debug!(element, "superseded running counter");
        }
        if target == 0 {
            document.set_text(element, "0");
            return;
        }

        let steps = duration.as_secs_f64() / self.tick.as_secs_f64();
        let total_ticks = (steps.ceil() as u32).max(1);
        let increment = target as f64 / steps;

        document.set_text(element, "0");
        let timer = scheduler.schedule_every(
            self.tick,
            Task::CounterTick {
                element: element.to_string(),
            },
        );
        self.running.insert(
            element.to_string(),
            Animation {
                target,
                current: 0.0,
                increment,
                ticks: 0,
                total_ticks,
                timer,
            },
        );
    }

    pub fn tick(
        &mut self,
        document: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        element: &str,
    ) {
        let Some(animation) = self.running.get_mut(element) else {
            return;
        };
        animation.current += animation.increment;
        animation.ticks += 1;

        let finished = animation.current >= animation.target as f64
            || animation.ticks >= animation.total_ticks;
        if finished {
            let target = animation.target;
            let timer = animation.timer;
            self.running.remove(element);
            scheduler.cancel(timer);
            document.set_text(element, &format_count(target));
        } else {
            let shown = (animation.current.floor() as u64).min(animation.target);
            document.set_text(element, &format_count(shown));
        }
    }

    pub fn is_running(&self, element: &str) -> bool {
        self.running.contains_key(element)
    }
}

/// Renders `value` with comma thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
