//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the state store operations to Dart via FRB.
//! - Own the single process-wide store instance.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as hyphenated UUID strings.
//! - The store database path is fixed once the store is first used.

use log::warn;
use mastery_core::db::open_db;
use mastery_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, ping as ping_inner,
    all_achievements, Aspect, BackupFrequency, Clock, DailyProgressPatch, GoalPatch, NewGoal,
    NewTask, SettingsPatch, SigilComplexity, SigilEvolution, SqliteUserRepository, StateStore,
    StoreConfig, SystemClock, TaskPatch, TaskType, Theme,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "mastery_store.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE: OnceLock<Mutex<StateStore<SqliteUserRepository>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Level a host should pass to `init_logging` when the user chose none.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().as_str().to_owned()
}

/// Sets the database file used by the store.
///
/// # FFI contract
/// - Must be called before any other store call to take effect.
/// - Repeating the same path is a no-op; a different path is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(db_path: String) -> String {
    let requested = PathBuf::from(db_path.trim());
    if requested.as_os_str().is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store already bound to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Generic action response envelope for store commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether the operation changed state.
    pub ok: bool,
    /// Id of the created entity, when any.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// JSON payload envelope for snapshot and export calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDataResponse {
    pub ok: bool,
    /// Pretty-printed aggregate JSON; empty on failure.
    pub payload: String,
    pub message: String,
}

/// Result of one removal tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTickResponse {
    /// Tasks removed by this tick.
    pub removed_ids: Vec<String>,
    /// Next pending removal, in epoch milliseconds, for re-arming a timer.
    pub next_deadline_epoch_ms: Option<i64>,
}

/// Adds a task.
///
/// # FFI contract
/// - Blank titles are rejected with `ok=false`.
/// - `linked_goal_ids` entries must be UUID strings.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: Option<String>,
    recurring: bool,
    should_disappear: bool,
    linked_goal_ids: Vec<String>,
) -> StoreActionResponse {
    let linked_goals = match parse_ids(&linked_goal_ids) {
        Ok(ids) => ids,
        Err(message) => return StoreActionResponse::failure(message),
    };
    let input = NewTask {
        title: title.trim().to_string(),
        description: description.filter(|value| !value.trim().is_empty()),
        linked_goals,
        kind: if recurring {
            TaskType::Recurring
        } else {
            TaskType::OneOff
        },
        should_disappear,
    };
    match with_store(|store| store.add_task(input)) {
        Ok(Some(task_id)) => {
            StoreActionResponse::success("Task added.", Some(task_id.to_string()))
        }
        Ok(None) => StoreActionResponse::failure("task_add failed: title must not be blank"),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// Completes a task and, for disappearing tasks, schedules its removal.
#[flutter_rust_bridge::frb(sync)]
pub fn task_complete(task_id: String) -> StoreActionResponse {
    run_id_command(&task_id, "task_complete", "Task completed.", |store, id| {
        let completed = store.complete_task(id);
        if completed {
            store.sync_sigil_level();
        }
        completed
    })
}

/// Merges the given fields into a task; `None` keeps the stored value.
///
/// # FFI contract
/// - A blank `description` clears it.
/// - `completed=false` reopens the task and cancels its pending removal.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update(
    task_id: String,
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
    should_disappear: Option<bool>,
) -> StoreActionResponse {
    let title = title.map(|value| value.trim().to_string());
    if title.as_deref() == Some("") {
        return StoreActionResponse::failure("task_update failed: title must not be blank");
    }
    let patch = TaskPatch {
        title,
        description: description.map(non_blank),
        completed,
        should_disappear,
        ..TaskPatch::default()
    };
    run_id_command(&task_id, "task_update", "Task updated.", move |store, id| {
        store.update_task(id, patch)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> StoreActionResponse {
    run_id_command(&task_id, "task_delete", "Task deleted.", |store, id| {
        store.delete_task(id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(title: String, description: String, category: String) -> StoreActionResponse {
    let input = NewGoal {
        title: title.trim().to_string(),
        description,
        category,
        ..NewGoal::default()
    };
    match with_store(|store| store.add_goal(input)) {
        Ok(Some(goal_id)) => {
            StoreActionResponse::success("Goal added.", Some(goal_id.to_string()))
        }
        Ok(None) => StoreActionResponse::failure("goal_add failed"),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// Applies a signed progress change; the result is clamped into `0..=100`.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_update_progress(
    goal_id: String,
    progress_change: i32,
    task_ids: Vec<String>,
) -> StoreActionResponse {
    let task_ids = match parse_ids(&task_ids) {
        Ok(ids) => ids,
        Err(message) => return StoreActionResponse::failure(message),
    };
    run_id_command(
        &goal_id,
        "goal_update_progress",
        "Goal progress updated.",
        move |store, id| store.update_goal_progress(id, progress_change, task_ids),
    )
}

/// Merges the given fields into a goal. `progress` is absolute and clamped.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_update(
    goal_id: String,
    title: Option<String>,
    description: Option<String>,
    progress: Option<i32>,
    category: Option<String>,
) -> StoreActionResponse {
    let patch = GoalPatch {
        title: title.map(|value| value.trim().to_string()),
        description,
        progress,
        category,
        ..GoalPatch::default()
    };
    run_id_command(&goal_id, "goal_update", "Goal updated.", move |store, id| {
        store.update_goal(id, patch)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(goal_id: String) -> StoreActionResponse {
    run_id_command(&goal_id, "goal_delete", "Goal deleted.", |store, id| {
        store.delete_goal(id)
    })
}

/// Upserts today's ledger entry; `None` fields keep their stored value.
///
/// # FFI contract
/// - Blank `notes` clears the stored notes.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_progress_record(
    energy_level: Option<u8>,
    deep_work_minutes: Option<u32>,
    notes: Option<String>,
) -> StoreActionResponse {
    let patch = DailyProgressPatch {
        energy_level,
        deep_work_minutes,
        notes: notes.map(non_blank),
        ..DailyProgressPatch::default()
    };
    match with_store(|store| store.record_daily_progress(patch)) {
        Ok(()) => StoreActionResponse::success("Daily progress recorded.", None),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// Today's ledger entry as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayProgressResponse {
    /// Whether an entry exists for today.
    pub found: bool,
    /// `YYYY-MM-DD` in UTC.
    pub date: String,
    pub tasks_completed: u32,
    pub goal_updates: u32,
    pub sigil_changes: u32,
    pub energy_level: u8,
    pub deep_work_minutes: u32,
    pub notes: Option<String>,
}

#[flutter_rust_bridge::frb(sync)]
pub fn daily_progress_today() -> TodayProgressResponse {
    let today = SystemClock.today();
    let entry = with_store(|store| store.get_today_progress().cloned())
        .ok()
        .flatten();
    match entry {
        Some(entry) => TodayProgressResponse {
            found: true,
            date: entry.date.to_string(),
            tasks_completed: count(entry.tasks_completed.len()),
            goal_updates: count(entry.goals_progress.len()),
            sigil_changes: count(entry.sigil_changes.len()),
            energy_level: entry.energy_level,
            deep_work_minutes: entry.deep_work_minutes,
            notes: entry.notes,
        },
        None => TodayProgressResponse {
            found: false,
            date: today.to_string(),
            tasks_completed: 0,
            goal_updates: 0,
            sigil_changes: 0,
            energy_level: 0,
            deep_work_minutes: 0,
            notes: None,
        },
    }
}

/// Merges user settings. Enum fields take their lowercase wire names.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(
    theme: Option<String>,
    notifications: Option<bool>,
    backup_frequency: Option<String>,
    sigil_complexity: Option<String>,
    progress_reminders: Option<bool>,
) -> StoreActionResponse {
    let patch = match build_settings_patch(
        theme,
        notifications,
        backup_frequency,
        sigil_complexity,
        progress_reminders,
    ) {
        Ok(patch) => patch,
        Err(message) => return StoreActionResponse::failure(message),
    };
    match with_store(|store| store.update_settings(patch)) {
        Ok(true) => StoreActionResponse::success("Settings updated.", None),
        Ok(false) => StoreActionResponse::failure("settings_update failed: nothing changed"),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// One catalog achievement with the user's unlock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Unlock time in epoch milliseconds; `None` while locked.
    pub unlocked_at_epoch_ms: Option<i64>,
}

/// Full achievement catalog, locked entries included, in catalog order.
#[flutter_rust_bridge::frb(sync)]
pub fn achievement_catalog() -> Vec<AchievementItem> {
    let unlocked = with_store(|store| store.user().achievements.clone()).unwrap_or_default();
    all_achievements()
        .into_iter()
        .map(|achievement| {
            let unlocked_at = unlocked
                .iter()
                .find(|owned| owned.id == achievement.id)
                .and_then(|owned| owned.unlocked_at);
            AchievementItem {
                id: achievement.id,
                title: achievement.title,
                description: achievement.description,
                icon: achievement.icon,
                unlocked_at_epoch_ms: unlocked_at.map(|at| at.timestamp_millis()),
            }
        })
        .collect()
}

/// Applies a manual aspect change. `aspect` is one of the five aspect names.
#[flutter_rust_bridge::frb(sync)]
pub fn sigil_evolve(aspect: String, change: i32, reason: String) -> StoreActionResponse {
    let Some(aspect) = Aspect::parse(&aspect) else {
        return StoreActionResponse::failure(format!(
            "sigil_evolve failed: unknown aspect `{}`",
            aspect.trim()
        ));
    };
    match with_store(|store| {
        let evolution = SigilEvolution {
            aspect,
            change,
            reason,
            timestamp: SystemClock.now(),
        };
        store.evolve_sigil(evolution);
        store.sync_sigil_level()
    }) {
        Ok(level) => StoreActionResponse::success(format!("Sigil level: {level:?}."), None),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// Computes and stores the design token for the current aspects.
#[flutter_rust_bridge::frb(sync)]
pub fn sigil_generate_design() -> StoreActionResponse {
    match with_store(|store| {
        let token = store.generate_sigil_design();
        store.apply_sigil_design(token.clone());
        token
    }) {
        Ok(token) => StoreActionResponse::success(token, None),
        Err(message) => StoreActionResponse::failure(message),
    }
}

/// Executes due removals. Hosts call this from a timer.
#[flutter_rust_bridge::frb(sync)]
pub fn store_tick() -> StoreTickResponse {
    match with_store(|store| {
        let removed = store.run_due_removals();
        (removed, store.pending_removals().next_deadline())
    }) {
        Ok((removed, next_deadline)) => StoreTickResponse {
            removed_ids: removed.iter().map(Uuid::to_string).collect(),
            next_deadline_epoch_ms: next_deadline.map(|deadline| deadline.timestamp_millis()),
        },
        Err(_) => StoreTickResponse {
            removed_ids: Vec::new(),
            next_deadline_epoch_ms: None,
        },
    }
}

/// Returns the full aggregate as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn data_export() -> StoreDataResponse {
    match with_store(|store| store.export_data()) {
        Ok(Ok(payload)) => StoreDataResponse {
            ok: true,
            payload,
            message: "Exported.".to_string(),
        },
        Ok(Err(err)) => StoreDataResponse {
            ok: false,
            payload: String::new(),
            message: format!("data_export failed: {err}"),
        },
        Err(message) => StoreDataResponse {
            ok: false,
            payload: String::new(),
            message,
        },
    }
}

/// Replaces the aggregate with a previously exported payload.
///
/// # FFI contract
/// - Malformed payloads return `ok=false` and leave state untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn data_import(payload: String) -> StoreActionResponse {
    match with_store(|store| store.import_data(&payload)) {
        Ok(Ok(())) => StoreActionResponse::success("Imported.", None),
        Ok(Err(err)) => StoreActionResponse::failure(format!("data_import failed: {err}")),
        Err(message) => StoreActionResponse::failure(message),
    }
}

fn run_id_command(
    raw_id: &str,
    op: &str,
    success_message: &str,
    f: impl FnOnce(&mut StateStore<SqliteUserRepository>, Uuid) -> bool,
) -> StoreActionResponse {
    let id = match Uuid::parse_str(raw_id.trim()) {
        Ok(id) => id,
        Err(err) => return StoreActionResponse::failure(format!("{op} failed: invalid id: {err}")),
    };
    match with_store(|store| f(store, id)) {
        Ok(true) => StoreActionResponse::success(success_message, Some(id.to_string())),
        Ok(false) => StoreActionResponse::failure(format!("{op} failed: nothing changed for {id}")),
        Err(message) => StoreActionResponse::failure(message),
    }
}

fn build_settings_patch(
    theme: Option<String>,
    notifications: Option<bool>,
    backup_frequency: Option<String>,
    sigil_complexity: Option<String>,
    progress_reminders: Option<bool>,
) -> Result<SettingsPatch, String> {
    let theme = theme
        .map(|raw| Theme::parse(&raw).ok_or_else(|| invalid_setting("theme", &raw)))
        .transpose()?;
    let backup_frequency = backup_frequency
        .map(|raw| {
            BackupFrequency::parse(&raw).ok_or_else(|| invalid_setting("backup_frequency", &raw))
        })
        .transpose()?;
    let sigil_complexity = sigil_complexity
        .map(|raw| {
            SigilComplexity::parse(&raw).ok_or_else(|| invalid_setting("sigil_complexity", &raw))
        })
        .transpose()?;
    Ok(SettingsPatch {
        theme,
        notifications,
        backup_frequency,
        sigil_complexity,
        progress_reminders,
    })
}

fn invalid_setting(field: &str, raw: &str) -> String {
    format!("settings_update failed: unknown {field} `{}`", raw.trim())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn parse_ids(raw_ids: &[String]) -> Result<Vec<Uuid>, String> {
    raw_ids
        .iter()
        .map(|raw| {
            Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id `{}`: {err}", raw.trim()))
        })
        .collect()
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MASTERY_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn store() -> Result<&'static Mutex<StateStore<SqliteUserRepository>>, String> {
    if let Some(store) = STORE.get() {
        return Ok(store);
    }
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let config = StoreConfig::default();
    let repo = SqliteUserRepository::new(conn, config.storage_key.clone());
    let opened = StateStore::open(repo, SystemClock, config)
        .map_err(|err| format!("store init failed: {err}"))?;
    // A concurrent caller may have initialized first; keep theirs.
    Ok(STORE.get_or_init(|| Mutex::new(opened)))
}

fn lock(
    store: &'static Mutex<StateStore<SqliteUserRepository>>,
) -> MutexGuard<'static, StateStore<SqliteUserRepository>> {
    store.lock().unwrap_or_else(|poisoned| {
        warn!("event=store_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    })
}

fn with_store<T>(f: impl FnOnce(&mut StateStore<SqliteUserRepository>) -> T) -> Result<T, String> {
    let store = store()?;
    let mut guard = lock(store);
    Ok(f(&mut guard))
}

#[cfg(test)]
mod tests {
    use super::{
        achievement_catalog, configure_store_path, core_version, daily_progress_record,
        default_log_level,
        daily_progress_today, data_export, data_import, goal_add, goal_delete, goal_update,
        goal_update_progress, init_logging, ping, settings_update, sigil_evolve,
        sigil_generate_design, store_tick, task_add, task_complete, task_delete, task_update,
        with_store,
    };
    use mastery_core::{SigilLevel, Theme};
    use uuid::Uuid;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn default_log_level_is_accepted_by_init_logging() {
        let level = default_log_level();
        assert!(mastery_core::LogLevel::parse(&level).is_some());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_path_rejects_blank_path() {
        assert!(!configure_store_path("   ".to_string()).is_empty());
    }

    #[test]
    fn task_add_and_complete_round_trip() {
        let title = unique_token("ffi-task");
        let added = task_add(title.clone(), None, false, false, Vec::new());
        assert!(added.ok, "{}", added.message);
        let task_id = added.id.expect("task add should return id");

        let completed = task_complete(task_id.clone());
        assert!(completed.ok, "{}", completed.message);
        let again = task_complete(task_id.clone());
        assert!(!again.ok);

        let exported = data_export();
        assert!(exported.ok, "{}", exported.message);
        assert!(exported.payload.contains(&title));

        assert!(task_delete(task_id).ok);
    }

    #[test]
    fn task_add_rejects_blank_title_and_bad_goal_ids() {
        assert!(!task_add("   ".to_string(), None, false, true, Vec::new()).ok);
        let response = task_add(
            "linked".to_string(),
            None,
            false,
            true,
            vec!["not-a-uuid".to_string()],
        );
        assert!(!response.ok);
        assert!(response.message.contains("invalid id"));
    }

    #[test]
    fn unknown_and_malformed_ids_fail_without_panicking() {
        let unknown = task_complete(uuid::Uuid::new_v4().to_string());
        assert!(!unknown.ok);
        assert!(unknown.message.contains("nothing changed"));

        let malformed = goal_delete("42".to_string());
        assert!(!malformed.ok);
        assert!(malformed.message.contains("invalid id"));
    }

    #[test]
    fn goal_progress_flow() {
        let added = goal_add(unique_token("ffi-goal"), String::new(), "Health".to_string());
        assert!(added.ok, "{}", added.message);
        let goal_id = added.id.expect("goal add should return id");

        assert!(goal_update_progress(goal_id.clone(), 150, Vec::new()).ok);
        assert!(goal_delete(goal_id).ok);
    }

    #[test]
    fn daily_progress_and_sigil_calls_succeed() {
        assert!(daily_progress_record(Some(7), Some(30), None).ok);
        assert!(sigil_evolve("Knowledge".to_string(), 1, "ffi test".to_string()).ok);
        assert!(!sigil_evolve("wisdom".to_string(), 1, "ffi test".to_string()).ok);

        let design = sigil_generate_design();
        assert!(design.ok);
        assert!(design.message.starts_with("sigil-"));
    }

    #[test]
    fn store_tick_never_fails() {
        let tick = store_tick();
        assert!(tick.removed_ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn malformed_import_is_rejected() {
        let response = data_import("{ broken".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("data_import failed"));
    }

    #[test]
    fn task_complete_keeps_level_in_step_with_aspects() {
        let added = task_add(unique_token("ffi-level"), None, false, false, Vec::new());
        let task_id = added.id.expect("task add should return id");

        assert!(task_complete(task_id.clone()).ok);

        let (level, expected) = with_store(|store| {
            let sigil = &store.user().sigil;
            (sigil.level, SigilLevel::for_total_score(sigil.aspects.total()))
        })
        .expect("store should open");
        assert_eq!(level, expected);
        assert!(task_delete(task_id).ok);
    }

    #[test]
    fn task_update_merges_and_rejects_blank_title() {
        let added = task_add(unique_token("ffi-update"), None, false, false, Vec::new());
        let task_id = added.id.expect("task add should return id");
        let renamed = unique_token("ffi-renamed");

        let updated = task_update(
            task_id.clone(),
            Some(renamed.clone()),
            Some("details".to_string()),
            None,
            None,
        );
        assert!(updated.ok, "{}", updated.message);
        assert!(!task_update(task_id.clone(), Some("  ".to_string()), None, None, None).ok);

        let id = Uuid::parse_str(&task_id).unwrap();
        let (title, description) = with_store(|store| {
            let task = store.user().task(id).cloned().expect("task should exist");
            (task.title, task.description)
        })
        .unwrap();
        assert_eq!(title, renamed);
        assert_eq!(description.as_deref(), Some("details"));
        assert!(task_delete(task_id).ok);
    }

    #[test]
    fn goal_update_clamps_absolute_progress() {
        let added = goal_add(unique_token("ffi-goal-update"), String::new(), String::new());
        let goal_id = added.id.expect("goal add should return id");

        assert!(goal_update(goal_id.clone(), None, None, Some(250), Some("Mind".to_string())).ok);

        let id = Uuid::parse_str(&goal_id).unwrap();
        let progress = with_store(|store| store.user().goal(id).map(|goal| goal.progress))
            .unwrap()
            .expect("goal should exist");
        assert_eq!(progress, 100);
        assert!(goal_delete(goal_id).ok);
    }

    #[test]
    fn blank_notes_clear_todays_notes() {
        assert!(daily_progress_record(None, None, Some("ffi notes".to_string())).ok);
        assert_eq!(
            daily_progress_today().notes.as_deref(),
            Some("ffi notes")
        );

        assert!(daily_progress_record(None, None, Some("   ".to_string())).ok);
        let today = daily_progress_today();
        assert!(today.found);
        assert_eq!(today.notes, None);
    }

    #[test]
    fn settings_update_parses_wire_names() {
        assert!(settings_update(Some("Dark".to_string()), None, None, None, None).ok);
        assert_eq!(
            with_store(|store| store.user().settings.theme).unwrap(),
            Theme::Dark
        );
        assert!(settings_update(Some("light".to_string()), None, None, None, None).ok);

        let invalid = settings_update(None, None, Some("hourly".to_string()), None, None);
        assert!(!invalid.ok);
        assert!(invalid.message.contains("backup_frequency"));
    }

    #[test]
    fn achievement_catalog_lists_locked_entries() {
        let catalog = achievement_catalog();

        assert_eq!(catalog.len(), mastery_core::all_achievements().len());
        assert!(catalog.iter().any(|item| item.id == "first_task"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
