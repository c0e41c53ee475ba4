//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mastery_core` linkage.
//! - Optionally dump the aggregate stored in a database file as JSON.

use mastery_core::db::open_db;
use mastery_core::{SqliteUserRepository, StateStore, StoreConfig, SystemClock};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("mastery_core ping={}", mastery_core::ping());
    println!("mastery_core version={}", mastery_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match export_from(&db_path) {
        Ok(payload) => {
            println!("{payload}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("mastery_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn export_from(db_path: &str) -> Result<String, String> {
    let conn = open_db(db_path).map_err(|err| format!("failed to open `{db_path}`: {err}"))?;
    let config = StoreConfig::default();
    let repo = SqliteUserRepository::new(conn, config.storage_key.clone());
    let store = StateStore::open(repo, SystemClock, config).map_err(|err| err.to_string())?;
    store.export_data().map_err(|err| err.to_string())
}
