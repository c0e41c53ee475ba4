//! Daily progress ledger model.
//!
//! # Responsibility
//! - Define the per-calendar-day activity record.
//! - Provide upsert merge semantics for partial daily updates.
//!
//! # Invariants
//! - The ledger holds at most one entry per `date`.
//! - `energy_level` stays within `1..=10`.

use crate::model::goal::GoalProgressEntry;
use crate::model::sigil::SigilEvolution;
use crate::model::task::TaskId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_ENERGY_LEVEL: u8 = 1;
pub const MAX_ENERGY_LEVEL: u8 = 10;
pub const DEFAULT_ENERGY_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub tasks_completed: Vec<TaskId>,
    pub goals_progress: Vec<GoalProgressEntry>,
    pub sigil_changes: Vec<SigilEvolution>,
    pub energy_level: u8,
    pub deep_work_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial fields for `StateStore::record_daily_progress`.
///
/// Set fields replace the stored value wholesale (shallow merge).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyProgressPatch {
    pub tasks_completed: Option<Vec<TaskId>>,
    pub goals_progress: Option<Vec<GoalProgressEntry>>,
    pub sigil_changes: Option<Vec<SigilEvolution>>,
    pub energy_level: Option<u8>,
    pub deep_work_minutes: Option<u32>,
    /// `Some(None)` clears notes.
    pub notes: Option<Option<String>>,
}

impl DailyProgress {
    /// Empty entry for `date` with default energy and no deep work.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tasks_completed: Vec::new(),
            goals_progress: Vec::new(),
            sigil_changes: Vec::new(),
            energy_level: DEFAULT_ENERGY_LEVEL,
            deep_work_minutes: 0,
            notes: None,
        }
    }

    pub fn merge(&mut self, patch: DailyProgressPatch) {
        if let Some(tasks_completed) = patch.tasks_completed {
            self.tasks_completed = tasks_completed;
        }
        if let Some(goals_progress) = patch.goals_progress {
            self.goals_progress = goals_progress;
        }
        if let Some(sigil_changes) = patch.sigil_changes {
            self.sigil_changes = sigil_changes;
        }
        if let Some(energy_level) = patch.energy_level {
            self.energy_level = energy_level.clamp(MIN_ENERGY_LEVEL, MAX_ENERGY_LEVEL);
        }
        if let Some(deep_work_minutes) = patch.deep_work_minutes {
            self.deep_work_minutes = deep_work_minutes;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Returns the ledger entry for `date`, creating an empty one when missing.
pub fn entry_for_date(ledger: &mut Vec<DailyProgress>, date: NaiveDate) -> &mut DailyProgress {
    let index = match ledger.iter().position(|entry| entry.date == date) {
        Some(index) => index,
        None => {
            ledger.push(DailyProgress::empty(date));
            ledger.len() - 1
        }
    };
    &mut ledger[index]
}

#[cfg(test)]
mod tests {
    use super::{entry_for_date, DailyProgress, DailyProgressPatch, DEFAULT_ENERGY_LEVEL};
    use chrono::NaiveDate;

    #[test]
    fn entry_for_date_reuses_existing_entry() {
        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let mut ledger = vec![DailyProgress::empty(day)];
        entry_for_date(&mut ledger, day).deep_work_minutes = 30;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].deep_work_minutes, 30);
        assert_eq!(ledger[0].energy_level, DEFAULT_ENERGY_LEVEL);
    }

    #[test]
    fn merge_clamps_energy_level() {
        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let mut entry = DailyProgress::empty(day);
        entry.merge(DailyProgressPatch {
            energy_level: Some(0),
            ..DailyProgressPatch::default()
        });
        assert_eq!(entry.energy_level, 1);
        entry.merge(DailyProgressPatch {
            energy_level: Some(42),
            ..DailyProgressPatch::default()
        });
        assert_eq!(entry.energy_level, 10);
    }
}
