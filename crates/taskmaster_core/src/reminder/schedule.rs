//! Deadline bookkeeping for reminder firings.
//!
//! The schedule holds two slots armed together: a one-shot initial slot and
//! a recurring slot anchored at the arm time. Hosts poll with the current
//! time; there is no background thread, so dropping the schedule cancels
//! both slots.

use crate::config::ReminderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedule {
    initial_due_ms: Option<i64>,
    next_interval_due_ms: i64,
    interval_ms: i64,
}

impl ReminderSchedule {
    /// Arms both slots relative to `now_ms`.
    pub fn arm(now_ms: i64, config: &ReminderConfig) -> Self {
        Self {
            initial_due_ms: Some(now_ms.saturating_add(config.initial_delay_ms)),
            next_interval_due_ms: now_ms.saturating_add(config.interval_ms),
            interval_ms: config.interval_ms.max(1),
        }
    }

    /// Earliest pending deadline.
    pub fn next_due_ms(&self) -> i64 {
        match self.initial_due_ms {
            Some(initial) => initial.min(self.next_interval_due_ms),
            None => self.next_interval_due_ms,
        }
    }

    /// Consumes every slot due at `now_ms`. Returns whether any was due.
    ///
    /// Missed recurring slots coalesce into one firing and the next deadline
    /// moves strictly past `now_ms`.
    pub fn take_due(&mut self, now_ms: i64) -> bool {
        let mut due = false;

        if self.initial_due_ms.is_some_and(|initial| initial <= now_ms) {
            self.initial_due_ms = None;
            due = true;
        }

        if self.next_interval_due_ms <= now_ms {
            let missed = (now_ms - self.next_interval_due_ms) / self.interval_ms + 1;
            self.next_interval_due_ms = self
                .next_interval_due_ms
                .saturating_add(missed.saturating_mul(self.interval_ms));
            due = true;
        }

        due
    }
}
