//! Persistence provider layer.
//!
//! # Responsibility
//! - Define the load/save contract the state store writes through.
//! - Isolate SQLite and JSON codec details from store orchestration.
//!
//! # Invariants
//! - Repositories never hand out an aggregate that fails `User::validate()`.

pub mod user_repo;
