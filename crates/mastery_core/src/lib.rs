//! Core state model for the Inner Mastery tracker.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::goal::{Goal, GoalId, GoalPatch, GoalProgressEntry, NewGoal};
pub use model::progress::{DailyProgress, DailyProgressPatch};
pub use model::sigil::{Aspect, Aspects, SigilEvolution, SigilLevel, SigilState};
pub use model::task::{AnimationState, NewTask, Task, TaskId, TaskPatch, TaskType};
pub use model::user::{
    Achievement, AchievementCategory, BackupFrequency, SettingsPatch, SigilComplexity, Theme,
    User, UserSettings, UserStats, UserValidationError,
};
pub use repo::user_repo::{
    InMemoryUserRepository, RepoError, RepoResult, SqliteUserRepository, UserRepository,
};
pub use service::achievements::all_achievements;
pub use service::store::{StateStore, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
