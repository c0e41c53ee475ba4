//! User root aggregate.
//!
//! # Responsibility
//! - Own every persisted piece of application state in one value.
//! - Validate cross-entity invariants before an external payload is accepted.
//!
//! # Invariants
//! - Exactly one live `User` exists per store; readers get snapshots.
//! - `stats` is derived; it is recomputed, never edited by callers.
//!
//! # See also
//! - `service::store` for the mutation rules.

use crate::model::goal::{Goal, GoalId, MAX_GOAL_PROGRESS};
use crate::model::progress::{DailyProgress, MAX_ENERGY_LEVEL, MIN_ENERGY_LEVEL};
use crate::model::sigil::SigilState;
use crate::model::task::{Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of the single local user.
pub const DEFAULT_USER_ID: &str = "user-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Consistency,
    Depth,
    Integration,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_tasks_completed: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub average_daily_completion: f64,
    pub sigil_evolution_count: u64,
    pub deep_work_hours: f64,
    pub last_active_date: DateTime<Utc>,
}

impl UserStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_tasks_completed: 0,
            current_streak: 0,
            longest_streak: 0,
            average_daily_completion: 0.0,
            sigil_evolution_count: 0,
            deep_work_hours: 0.0,
            last_active_date: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigilComplexity {
    #[default]
    Simple,
    Detailed,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl BackupFrequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl SigilComplexity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "detailed" => Some(Self::Detailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub notifications: bool,
    pub backup_frequency: BackupFrequency,
    pub sigil_complexity: SigilComplexity,
    pub progress_reminders: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            backup_frequency: BackupFrequency::Daily,
            sigil_complexity: SigilComplexity::Simple,
            progress_reminders: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub backup_frequency: Option<BackupFrequency>,
    pub sigil_complexity: Option<SigilComplexity>,
    pub progress_reminders: Option<bool>,
}

impl UserSettings {
    pub fn apply_patch(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(backup_frequency) = patch.backup_frequency {
            self.backup_frequency = backup_frequency;
        }
        if let Some(sigil_complexity) = patch.sigil_complexity {
            self.sigil_complexity = sigil_complexity;
        }
        if let Some(progress_reminders) = patch.progress_reminders {
            self.progress_reminders = progress_reminders;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub sigil: SigilState,
    pub achievements: Vec<Achievement>,
    pub tasks: Vec<Task>,
    pub goals: Vec<Goal>,
    pub stats: UserStats,
    pub daily_progress: Vec<DailyProgress>,
    pub settings: UserSettings,
}

/// Invariant violations detected on an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankUserId,
    NilTaskId,
    NilGoalId,
    DuplicateTaskId(TaskId),
    DuplicateGoalId(GoalId),
    CompletionMismatch(TaskId),
    ProgressOutOfRange { goal_id: GoalId, progress: u8 },
    EnergyOutOfRange { date: NaiveDate, energy_level: u8 },
    DuplicateDailyEntry(NaiveDate),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUserId => write!(f, "user id must not be blank"),
            Self::NilTaskId => write!(f, "task id must not be nil"),
            Self::NilGoalId => write!(f, "goal id must not be nil"),
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id: {id}"),
            Self::DuplicateGoalId(id) => write!(f, "duplicate goal id: {id}"),
            Self::CompletionMismatch(id) => write!(
                f,
                "task {id}: completed flag and completedAt must be set together"
            ),
            Self::ProgressOutOfRange { goal_id, progress } => write!(
                f,
                "goal {goal_id}: progress ({progress}) must be <= {MAX_GOAL_PROGRESS}"
            ),
            Self::EnergyOutOfRange { date, energy_level } => write!(
                f,
                "daily progress {date}: energyLevel ({energy_level}) must be within {MIN_ENERGY_LEVEL}..={MAX_ENERGY_LEVEL}"
            ),
            Self::DuplicateDailyEntry(date) => {
                write!(f, "daily progress has more than one entry for {date}")
            }
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Fresh aggregate for a first launch.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: DEFAULT_USER_ID.to_string(),
            sigil: SigilState::default(),
            achievements: Vec::new(),
            tasks: Vec::new(),
            goals: Vec::new(),
            stats: UserStats::new(now),
            daily_progress: Vec::new(),
            settings: UserSettings::default(),
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn daily_entry(&self, date: NaiveDate) -> Option<&DailyProgress> {
        self.daily_progress.iter().find(|entry| entry.date == date)
    }

    /// Checks every aggregate invariant.
    ///
    /// # Errors
    /// - Returns the first violation found, scanning tasks, goals, then ledger.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.trim().is_empty() {
            return Err(UserValidationError::BlankUserId);
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if task.id.is_nil() {
                return Err(UserValidationError::NilTaskId);
            }
            if !task_ids.insert(task.id) {
                return Err(UserValidationError::DuplicateTaskId(task.id));
            }
            if task.completed != task.completed_at.is_some() {
                return Err(UserValidationError::CompletionMismatch(task.id));
            }
        }

        let mut goal_ids = HashSet::new();
        for goal in &self.goals {
            if goal.id.is_nil() {
                return Err(UserValidationError::NilGoalId);
            }
            if !goal_ids.insert(goal.id) {
                return Err(UserValidationError::DuplicateGoalId(goal.id));
            }
            if goal.progress > MAX_GOAL_PROGRESS {
                return Err(UserValidationError::ProgressOutOfRange {
                    goal_id: goal.id,
                    progress: goal.progress,
                });
            }
        }

        let mut dates = HashSet::new();
        for entry in &self.daily_progress {
            if !dates.insert(entry.date) {
                return Err(UserValidationError::DuplicateDailyEntry(entry.date));
            }
            if !(MIN_ENERGY_LEVEL..=MAX_ENERGY_LEVEL).contains(&entry.energy_level) {
                return Err(UserValidationError::EnergyOutOfRange {
                    date: entry.date,
                    energy_level: entry.energy_level,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackupFrequency, SigilComplexity, Theme};

    #[test]
    fn settings_enums_parse_wire_names() {
        assert_eq!(Theme::parse(" Dark "), Some(Theme::Dark));
        assert_eq!(BackupFrequency::parse("monthly"), Some(BackupFrequency::Monthly));
        assert_eq!(SigilComplexity::parse("DETAILED"), Some(SigilComplexity::Detailed));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
