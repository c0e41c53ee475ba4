//! Cancellable deferred task removal.
//!
//! # Responsibility
//! - Track which completed tasks are due to disappear, and when.
//!
//! # Invariants
//! - At most one pending removal per task id; rescheduling replaces it.
//! - Draining returns ids in deadline order and forgets them.

use crate::model::task::TaskId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSchedule {
    deadlines: HashMap<TaskId, DateTime<Utc>>,
}

impl RemovalSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task_id: TaskId, due_at: DateTime<Utc>) {
        self.deadlines.insert(task_id, due_at);
    }

    /// Returns whether a pending removal was cancelled.
    pub fn cancel(&mut self, task_id: TaskId) -> bool {
        self.deadlines.remove(&task_id).is_some()
    }

    pub fn is_scheduled(&self, task_id: TaskId) -> bool {
        self.deadlines.contains_key(&task_id)
    }

    pub fn due_at(&self, task_id: TaskId) -> Option<DateTime<Utc>> {
        self.deadlines.get(&task_id).copied()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Earliest pending deadline, for hosts that arm a single timer.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every entry due at or before `now`.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<TaskId> {
        let mut due: Vec<(DateTime<Utc>, TaskId)> = self
            .deadlines
            .iter()
            .filter(|(_, due_at)| **due_at <= now)
            .map(|(task_id, due_at)| (*due_at, *task_id))
            .collect();
        due.sort_unstable();

        for (_, task_id) in &due {
            self.deadlines.remove(task_id);
        }
        due.into_iter().map(|(_, task_id)| task_id).collect()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::RemovalSchedule;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn drain_due_returns_only_expired_entries_in_order() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap();
        let mut schedule = RemovalSchedule::new();
        let late = Uuid::new_v4();
        let early = Uuid::new_v4();
        let future = Uuid::new_v4();
        schedule.schedule(late, start + Duration::milliseconds(900));
        schedule.schedule(early, start + Duration::milliseconds(100));
        schedule.schedule(future, start + Duration::seconds(5));

        let drained = schedule.drain_due(start + Duration::seconds(1));

        assert_eq!(drained, vec![early, late]);
        assert!(schedule.is_scheduled(future));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn cancel_prevents_removal() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap();
        let mut schedule = RemovalSchedule::new();
        let id = Uuid::new_v4();
        schedule.schedule(id, start);

        assert!(schedule.cancel(id));
        assert!(!schedule.cancel(id));
        assert!(schedule.drain_due(start).is_empty());
    }
}
