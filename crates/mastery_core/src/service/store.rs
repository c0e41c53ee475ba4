//! State store: the single owner of the live `User` aggregate.
//!
//! # Responsibility
//! - Funnel every read and write of the aggregate through one operation set.
//! - Keep derived state (stats, achievements, ledger) in step with mutations.
//! - Write every committed mutation through to the persistence provider.
//!
//! # Invariants
//! - Each mutation clones the current aggregate, edits the clone, and swaps
//!   it in only when something changed. Handed-out snapshots never change.
//! - Operations on unknown ids are no-ops; the aggregate stays identical.
//! - Provider failures are logged and never surface from mutations.
//!
//! # See also
//! - `service::removal` for the deferred removal schedule.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, StoreConfig};
use crate::model::goal::{Goal, GoalId, GoalPatch, NewGoal};
use crate::model::progress::{entry_for_date, DailyProgress, DailyProgressPatch};
use crate::model::sigil::{SigilEvolution, SigilLevel};
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::model::user::{SettingsPatch, User};
use crate::repo::user_repo::{decode_user, encode_user_pretty, RepoError, UserRepository};
use crate::service::achievements::unlock_new_achievements;
use crate::service::removal::RemovalSchedule;
use crate::service::sigil::{design_token, task_completion_evolution};
use crate::service::stats::recompute_stats;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Errors surfaced by the few store operations that report failure.
#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid store config: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct StateStore<R: UserRepository, C: Clock = SystemClock> {
    user: Arc<User>,
    repo: R,
    clock: C,
    config: StoreConfig,
    removals: RemovalSchedule,
}

impl<R: UserRepository, C: Clock> StateStore<R, C> {
    /// Creates a store holding a fresh aggregate. Nothing is read or written.
    ///
    /// # Errors
    /// - Returns `StoreError::Config` when `config` fails validation.
    pub fn new(repo: R, clock: C, config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let user = User::new(clock.now());
        Ok(Self {
            user: Arc::new(user),
            repo,
            clock,
            config,
            removals: RemovalSchedule::new(),
        })
    }

    /// Creates a store and restores the persisted aggregate when one exists.
    pub fn open(repo: R, clock: C, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::new(repo, clock, config)?;
        store.load_data();
        Ok(store)
    }

    /// Read-only snapshot of the current aggregate.
    pub fn snapshot(&self) -> Arc<User> {
        Arc::clone(&self.user)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn pending_removals(&self) -> &RemovalSchedule {
        &self.removals
    }

    // ---- tasks -------------------------------------------------------------

    /// Adds an open task. Returns `None` (no-op) for a blank title.
    pub fn add_task(&mut self, input: NewTask) -> Option<TaskId> {
        if input.title.trim().is_empty() {
            debug!("event=task_add module=store status=noop reason=blank_title");
            return None;
        }
        self.commit("task_add", |user, now| {
            let task = Task::new(input, now);
            let task_id = task.id;
            user.tasks.push(task);
            Some(task_id)
        })
    }

    /// Completes a task, grants its discipline evolution, and schedules its
    /// removal when it should disappear.
    ///
    /// Returns `false` when the id is unknown or the task is already done.
    pub fn complete_task(&mut self, task_id: TaskId) -> bool {
        let delay = self.config.removal_delay();
        let outcome = self.commit("task_complete", |user, now| {
            let task = user.task_mut(task_id)?;
            if task.completed {
                return None;
            }
            task.complete(now);
            let evolution = task_completion_evolution(&task.title, now);
            let removal_due = task.should_disappear.then(|| deadline_after(now, delay));

            user.stats.total_tasks_completed += 1;
            user.stats.last_active_date = now;
            user.sigil.evolve(evolution.clone());

            let entry = entry_for_date(&mut user.daily_progress, now.date_naive());
            entry.tasks_completed.push(task_id);
            entry.sigil_changes.push(evolution);
            Some(removal_due)
        });

        match outcome {
            Some(removal_due) => {
                if let Some(due_at) = removal_due {
                    self.removals.schedule(task_id, due_at);
                }
                info!(
                    "event=task_complete module=store status=ok task_id={} removal_scheduled={}",
                    task_id,
                    removal_due.is_some()
                );
                true
            }
            None => false,
        }
    }

    /// Removes a task and cancels its pending removal.
    pub fn delete_task(&mut self, task_id: TaskId) -> bool {
        let removed = self
            .commit("task_delete", |user, _| {
                let index = user.tasks.iter().position(|task| task.id == task_id)?;
                user.tasks.remove(index);
                Some(())
            })
            .is_some();
        if removed {
            self.removals.cancel(task_id);
        }
        removed
    }

    /// Merges `patch` into a task. Reopening a task or clearing
    /// `should_disappear` cancels its pending removal.
    pub fn update_task(&mut self, task_id: TaskId, patch: TaskPatch) -> bool {
        let delay = self.config.removal_delay();
        let outcome = self.commit("task_update", |user, now| {
            let task = user.task_mut(task_id)?;
            task.apply_patch(patch, now);
            Some((task.pending_removal(), now))
        });

        match outcome {
            Some((true, now)) => {
                if !self.removals.is_scheduled(task_id) {
                    self.removals.schedule(task_id, deadline_after(now, delay));
                }
                true
            }
            Some((false, _)) => {
                self.removals.cancel(task_id);
                true
            }
            None => false,
        }
    }

    /// Executes every deferred removal that is due.
    ///
    /// Returns the ids actually removed. Tasks deleted or reopened since
    /// scheduling are skipped.
    pub fn run_due_removals(&mut self) -> Vec<TaskId> {
        let due = self.removals.drain_due(self.clock.now());
        if due.is_empty() {
            return Vec::new();
        }

        self.commit("task_auto_remove", |user, _| {
            let removed: Vec<TaskId> = user
                .tasks
                .iter()
                .filter(|task| due.contains(&task.id) && task.pending_removal())
                .map(|task| task.id)
                .collect();
            if removed.is_empty() {
                return None;
            }
            user.tasks.retain(|task| !removed.contains(&task.id));
            Some(removed)
        })
        .unwrap_or_default()
    }

    // ---- goals -------------------------------------------------------------

    pub fn add_goal(&mut self, input: NewGoal) -> Option<GoalId> {
        self.commit("goal_add", |user, now| {
            let goal = Goal::new(input, now);
            let goal_id = goal.id;
            user.goals.push(goal);
            Some(goal_id)
        })
    }

    /// Applies a signed progress change, clamped into `0..=100`, and records
    /// it in the goal history and today's ledger entry.
    pub fn update_goal_progress(
        &mut self,
        goal_id: GoalId,
        progress_change: i32,
        task_ids: Vec<TaskId>,
    ) -> bool {
        self.commit("goal_progress", |user, now| {
            let today = now.date_naive();
            let entry = user
                .goal_mut(goal_id)?
                .record_progress(progress_change, task_ids, today);
            entry_for_date(&mut user.daily_progress, today)
                .goals_progress
                .push(entry);
            Some(())
        })
        .is_some()
    }

    pub fn update_goal(&mut self, goal_id: GoalId, patch: GoalPatch) -> bool {
        self.commit("goal_update", |user, _| {
            user.goal_mut(goal_id)?.apply_patch(patch);
            Some(())
        })
        .is_some()
    }

    pub fn delete_goal(&mut self, goal_id: GoalId) -> bool {
        self.commit("goal_delete", |user, _| {
            let index = user.goals.iter().position(|goal| goal.id == goal_id)?;
            user.goals.remove(index);
            Some(())
        })
        .is_some()
    }

    // ---- daily ledger ------------------------------------------------------

    /// Upserts today's ledger entry, shallow-merging the given fields.
    pub fn record_daily_progress(&mut self, patch: DailyProgressPatch) {
        self.commit("daily_progress_record", |user, now| {
            entry_for_date(&mut user.daily_progress, now.date_naive()).merge(patch);
            Some(())
        });
    }

    pub fn get_today_progress(&self) -> Option<&DailyProgress> {
        self.user.daily_entry(self.clock.today())
    }

    // ---- sigil -------------------------------------------------------------

    /// Applies an externally driven evolution. Does not change the level.
    pub fn evolve_sigil(&mut self, evolution: SigilEvolution) {
        self.commit("sigil_evolve", |user, now| {
            user.sigil.evolve(evolution.clone());
            entry_for_date(&mut user.daily_progress, now.date_naive())
                .sigil_changes
                .push(evolution);
            Some(())
        });
    }

    /// Design token derived from current aspects. Pure; nothing is stored.
    pub fn generate_sigil_design(&self) -> String {
        design_token(&self.user.sigil.aspects)
    }

    /// Stores a design token as the current sigil design.
    pub fn apply_sigil_design(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        self.commit("sigil_design", |user, _| {
            if user.sigil.current_design == token {
                return None;
            }
            user.sigil.current_design = token;
            Some(())
        })
        .is_some()
    }

    /// Sets the sigil level from the aspect total bands.
    ///
    /// Returns the resulting level, whether or not it changed.
    pub fn sync_sigil_level(&mut self) -> SigilLevel {
        let target = SigilLevel::for_total_score(self.user.sigil.aspects.total());
        self.commit("sigil_level", |user, _| {
            if user.sigil.level == target {
                return None;
            }
            user.sigil.level = target;
            Some(())
        });
        self.user.sigil.level
    }

    // ---- stats & settings --------------------------------------------------

    /// Recomputes derived stats. Returns whether anything changed.
    pub fn update_stats(&mut self) -> bool {
        let window_days = self.config.stats_window_days;
        self.commit("stats_update", |user, now| {
            let stats_before = user.stats.clone();
            let unlocked_before = user.achievements.len();
            refresh_derived(user, now, window_days);
            let changed =
                user.stats != stats_before || user.achievements.len() != unlocked_before;
            changed.then_some(())
        })
        .is_some()
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> bool {
        self.commit("settings_update", |user, _| {
            let before = user.settings.clone();
            user.settings.apply_patch(patch);
            (user.settings != before).then_some(())
        })
        .is_some()
    }

    // ---- persistence -------------------------------------------------------

    /// Writes the current aggregate through to the provider.
    ///
    /// Returns `false` on failure; the error is logged, not surfaced.
    pub fn save_data(&self) -> bool {
        match self.repo.save(&self.user) {
            Ok(()) => {
                debug!("event=store_save module=store status=ok");
                true
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=save_failed error={}",
                    err
                );
                false
            }
        }
    }

    /// Replaces the in-memory aggregate with the persisted one.
    ///
    /// Returns `false` when nothing was stored or the payload was unusable;
    /// the current state is left untouched in both cases.
    pub fn load_data(&mut self) -> bool {
        match self.repo.load() {
            Ok(Some(user)) => {
                self.replace_user(user);
                info!(
                    "event=store_load module=store status=ok tasks={} goals={}",
                    self.user.tasks.len(),
                    self.user.goals.len()
                );
                true
            }
            Ok(None) => {
                info!("event=store_load module=store status=noop reason=no_payload");
                false
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=load_failed error={}",
                    err
                );
                false
            }
        }
    }

    /// Pretty-printed JSON of the full aggregate.
    pub fn export_data(&self) -> Result<String, StoreError> {
        Ok(encode_user_pretty(&self.user)?)
    }

    /// Replaces the aggregate with an exported payload and persists it.
    ///
    /// # Errors
    /// - Returns `StoreError::Repo` for malformed or invalid payloads; the
    ///   current state is left untouched.
    pub fn import_data(&mut self, payload: &str) -> Result<(), StoreError> {
        let user = match decode_user(payload) {
            Ok(user) => user,
            Err(err) => {
                warn!(
                    "event=store_import module=store status=error error_code=invalid_payload error={}",
                    err
                );
                return Err(err.into());
            }
        };
        self.replace_user(user);
        self.save_data();
        info!("event=store_import module=store status=ok");
        Ok(())
    }

    fn replace_user(&mut self, user: User) {
        self.user = Arc::new(user);
        self.removals.clear();
        // Removal timers do not survive restarts; re-arm them from state.
        let due_at = deadline_after(self.clock.now(), self.config.removal_delay());
        for task in self.user.tasks.iter().filter(|task| task.pending_removal()) {
            self.removals.schedule(task.id, due_at);
        }
    }

    /// Runs one whole-aggregate transition.
    ///
    /// `mutate` edits a private clone; returning `None` discards it.
    fn commit<T, F>(&mut self, op: &'static str, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut User, DateTime<Utc>) -> Option<T>,
    {
        let now = self.clock.now();
        let mut next = User::clone(&self.user);
        let Some(outcome) = mutate(&mut next, now) else {
            debug!("event=store_mutation module=store status=noop op={op}");
            return None;
        };

        refresh_derived(&mut next, now, self.config.stats_window_days);
        self.user = Arc::new(next);
        debug!("event=store_mutation module=store status=ok op={op}");
        self.save_data();
        Some(outcome)
    }
}

fn refresh_derived(user: &mut User, now: DateTime<Utc>, window_days: u32) {
    recompute_stats(user, now.date_naive(), window_days);
    let unlocked = unlock_new_achievements(user, now);
    if !unlocked.is_empty() {
        info!(
            "event=achievement_unlock module=store status=ok ids={}",
            unlocked.join(",")
        );
    }
}

fn deadline_after(now: DateTime<Utc>, delay: chrono::Duration) -> DateTime<Utc> {
    now.checked_add_signed(delay)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
