//! User aggregate persistence contracts and implementations.
//!
//! # Responsibility
//! - Store and retrieve the single serialized `User` blob under one key.
//! - Keep SQL and JSON codec details inside the persistence boundary.
//!
//! # Invariants
//! - Read paths validate the decoded aggregate instead of masking bad state.
//! - A failed write leaves the previously stored payload intact.

use crate::db::DbError;
use crate::model::user::{User, UserValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for the user aggregate.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored payload is not a well-formed aggregate.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// Payload parsed but breaks an aggregate invariant.
    Validation(UserValidationError),
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "invalid stored user payload: {err}"),
            Self::Encode(err) => write!(f, "failed to encode user payload: {err}"),
            Self::Validation(err) => write!(f, "invalid user aggregate: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Key-value persistence provider for the user aggregate.
pub trait UserRepository {
    /// Returns the stored aggregate, or `None` when nothing was saved yet.
    fn load(&self) -> RepoResult<Option<User>>;
    /// Replaces the stored aggregate.
    fn save(&self, user: &User) -> RepoResult<()>;
}

/// Decodes and validates a serialized aggregate.
pub fn decode_user(payload: &str) -> RepoResult<User> {
    let user: User = serde_json::from_str(payload).map_err(RepoError::Decode)?;
    user.validate()?;
    Ok(user)
}

/// Compact JSON used for storage.
pub fn encode_user(user: &User) -> RepoResult<String> {
    serde_json::to_string(user).map_err(RepoError::Encode)
}

/// Human-readable JSON used for export.
pub fn encode_user_pretty(user: &User) -> RepoResult<String> {
    serde_json::to_string_pretty(user).map_err(RepoError::Encode)
}

/// SQLite-backed provider storing the aggregate in `kv_store`.
pub struct SqliteUserRepository {
    conn: Connection,
    key: String,
}

impl SqliteUserRepository {
    /// Wraps a migrated connection; see `db::open_db`.
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored payload, without decoding.
    pub fn load_raw(&self) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// Stores a raw payload under this repository key.
    pub fn save_raw(&self, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload],
        )?;
        Ok(())
    }
}

impl UserRepository for SqliteUserRepository {
    fn load(&self) -> RepoResult<Option<User>> {
        match self.load_raw()? {
            Some(payload) => decode_user(&payload).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, user: &User) -> RepoResult<()> {
        let payload = encode_user(user)?;
        self.save_raw(&payload)
    }
}

/// In-process provider holding the serialized payload in memory.
///
/// Clones share storage, so a test can inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    payload: Arc<RwLock<Option<String>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the provider with a raw payload, valid or not.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Arc::new(RwLock::new(Some(payload.into()))),
        }
    }

    pub fn raw_payload(&self) -> RepoResult<Option<String>> {
        let payload = self
            .payload
            .read()
            .map_err(|_| RepoError::Unavailable("failed to acquire read lock".to_string()))?;
        Ok(payload.clone())
    }
}

impl UserRepository for InMemoryUserRepository {
    fn load(&self) -> RepoResult<Option<User>> {
        match self.raw_payload()? {
            Some(payload) => decode_user(&payload).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, user: &User) -> RepoResult<()> {
        let encoded = encode_user(user)?;
        let mut payload = self
            .payload
            .write()
            .map_err(|_| RepoError::Unavailable("failed to acquire write lock".to_string()))?;
        *payload = Some(encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_user, InMemoryUserRepository, RepoError, UserRepository};
    use crate::model::user::User;
    use chrono::{TimeZone, Utc};

    #[test]
    fn in_memory_clones_share_payload() {
        let repo = InMemoryUserRepository::new();
        let observer = repo.clone();
        let user = User::new(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());

        repo.save(&user).unwrap();

        assert_eq!(observer.load().unwrap(), Some(user));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = decode_user("{not json").unwrap_err();
        assert!(matches!(err, RepoError::Decode(_)));
    }

    #[test]
    fn decode_rejects_invariant_violations() {
        let mut value = serde_json::to_value(User::new(
            Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
        ))
        .unwrap();
        value["id"] = serde_json::json!("  ");
        let err = decode_user(&value.to_string()).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
