//! Task domain model.
//!
//! # Responsibility
//! - Define the actionable unit users complete to earn progress.
//! - Keep completion flag and completion timestamp in lockstep.
//!
//! # Invariants
//! - `completed == true` iff `completed_at.is_some()`.
//! - `id` is stable and never reused for another task.

use crate::model::goal::GoalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for tasks.
pub type TaskId = Uuid;

/// Recurrence kind of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    #[serde(rename = "one-off")]
    OneOff,
    #[serde(rename = "recurring")]
    Recurring,
}

/// Presentation-facing transition state.
///
/// Core only relies on `Completing` to mark a task pending removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    #[default]
    Idle,
    Completing,
    Disappearing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub linked_goals: Vec<GoalId>,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub should_disappear: bool,
    pub animation_state: AnimationState,
}

/// Input accepted by `StateStore::add_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub linked_goals: Vec<GoalId>,
    pub kind: TaskType,
    pub should_disappear: bool,
}

impl NewTask {
    /// One-off task that disappears after completion, the common quick-add shape.
    pub fn one_off(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            linked_goals: Vec::new(),
            kind: TaskType::OneOff,
            should_disappear: true,
        }
    }
}

/// Partial update for `StateStore::update_task`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub linked_goals: Option<Vec<GoalId>>,
    pub kind: Option<TaskType>,
    pub should_disappear: Option<bool>,
    pub animation_state: Option<AnimationState>,
}

impl Task {
    /// Creates an open task with a generated stable ID.
    pub fn new(input: NewTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: false,
            created_at,
            completed_at: None,
            linked_goals: input.linked_goals,
            kind: input.kind,
            should_disappear: input.should_disappear,
            animation_state: AnimationState::Idle,
        }
    }

    /// Marks the task done at `at`.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(at);
        self.animation_state = AnimationState::Completing;
    }

    /// Reopens a completed task.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
        self.animation_state = AnimationState::Idle;
    }

    /// Whether the task should be removed once its completion settles.
    pub fn pending_removal(&self) -> bool {
        self.completed && self.should_disappear
    }

    /// Merges `patch` into this task, keeping the completion invariant.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(linked_goals) = patch.linked_goals {
            self.linked_goals = linked_goals;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(should_disappear) = patch.should_disappear {
            self.should_disappear = should_disappear;
        }
        match patch.completed {
            Some(true) if !self.completed => self.complete(now),
            Some(false) if self.completed => self.reopen(),
            _ => {}
        }
        if let Some(animation_state) = patch.animation_state {
            self.animation_state = animation_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationState, NewTask, Task, TaskPatch};
    use chrono::{TimeZone, Utc};

    #[test]
    fn patch_completion_keeps_timestamp_in_sync() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::new(NewTask::one_off("stretch"), created);

        task.apply_patch(
            TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
            later,
        );
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(later));

        task.apply_patch(
            TaskPatch {
                completed: Some(false),
                ..TaskPatch::default()
            },
            later,
        );
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.animation_state, AnimationState::Idle);
    }

    #[test]
    fn patch_can_clear_description() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut input = NewTask::one_off("read");
        input.description = Some("twenty pages".to_string());
        let mut task = Task::new(input, created);

        task.apply_patch(
            TaskPatch {
                description: Some(None),
                ..TaskPatch::default()
            },
            created,
        );
        assert_eq!(task.description, None);
    }
}
