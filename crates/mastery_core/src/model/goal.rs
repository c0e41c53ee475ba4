//! Goal domain model.
//!
//! # Responsibility
//! - Define long-running objectives and their append-only progress history.
//!
//! # Invariants
//! - `progress` is always within `0..=100`.
//! - `daily_progress` entries are never edited after append.

use crate::model::task::TaskId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for goals.
pub type GoalId = Uuid;

/// Upper bound of goal progress, in percent.
pub const MAX_GOAL_PROGRESS: u8 = 100;

/// One immutable progress adjustment on a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressEntry {
    pub goal_id: GoalId,
    /// Requested signed change, recorded before clamping.
    pub progress_change: i32,
    pub tasks_completed: Vec<TaskId>,
    /// Minutes spent on the goal.
    pub time_spent: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub progress: u8,
    pub linked_tasks: Vec<TaskId>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
    pub daily_progress: Vec<GoalProgressEntry>,
}

/// Input accepted by `StateStore::add_goal`. Progress always starts at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub category: String,
    pub linked_tasks: Vec<TaskId>,
    pub target_date: Option<DateTime<Utc>>,
}

impl NewGoal {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for `StateStore::update_goal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute progress; clamped into `0..=100` on apply.
    pub progress: Option<i32>,
    pub linked_tasks: Option<Vec<TaskId>>,
    pub category: Option<String>,
    /// `Some(None)` clears the target date.
    pub target_date: Option<Option<DateTime<Utc>>>,
}

/// Clamps an arbitrary signed progress value into `0..=100`.
pub fn clamp_progress(value: i64) -> u8 {
    // Lossless: the clamp bounds fit in u8.
    value.clamp(0, i64::from(MAX_GOAL_PROGRESS)) as u8
}

impl Goal {
    /// Creates a goal with zero progress and empty history.
    pub fn new(input: NewGoal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            progress: 0,
            linked_tasks: input.linked_tasks,
            category: input.category,
            created_at,
            target_date: input.target_date,
            daily_progress: Vec::new(),
        }
    }

    /// Applies a signed progress change and appends the history entry.
    ///
    /// Returns the appended entry so callers can mirror it elsewhere.
    pub fn record_progress(
        &mut self,
        progress_change: i32,
        tasks_completed: Vec<TaskId>,
        date: NaiveDate,
    ) -> GoalProgressEntry {
        self.progress = clamp_progress(i64::from(self.progress) + i64::from(progress_change));
        let entry = GoalProgressEntry {
            goal_id: self.id,
            progress_change,
            tasks_completed,
            time_spent: 0,
            date,
        };
        self.daily_progress.push(entry.clone());
        entry
    }

    pub fn is_achieved(&self) -> bool {
        self.progress >= MAX_GOAL_PROGRESS
    }

    pub fn apply_patch(&mut self, patch: GoalPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(progress) = patch.progress {
            self.progress = clamp_progress(i64::from(progress));
        }
        if let Some(linked_tasks) = patch.linked_tasks {
            self.linked_tasks = linked_tasks;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(target_date) = patch.target_date {
            self.target_date = target_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_progress, Goal, GoalPatch, NewGoal};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn clamp_progress_saturates_both_ends() {
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(42), 42);
        assert_eq!(clamp_progress(i64::MAX), 100);
    }

    #[test]
    fn record_progress_keeps_requested_change_in_history() {
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let mut goal = Goal::new(NewGoal::titled("run 10k"), created);

        goal.record_progress(80, Vec::new(), day);
        let entry = goal.record_progress(80, Vec::new(), day);

        assert_eq!(goal.progress, 100);
        assert_eq!(entry.progress_change, 80);
        assert_eq!(entry.time_spent, 0);
        assert_eq!(goal.daily_progress.len(), 2);
    }

    #[test]
    fn patch_progress_is_clamped() {
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let mut goal = Goal::new(NewGoal::titled("meditate"), created);
        goal.apply_patch(GoalPatch {
            progress: Some(250),
            ..GoalPatch::default()
        });
        assert_eq!(goal.progress, 100);
    }
}
