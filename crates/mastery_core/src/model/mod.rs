//! Domain model for the mastery tracker.
//!
//! # Responsibility
//! - Define the canonical data structures owned by the `User` aggregate.
//! - Keep the JSON wire shape (camelCase) stable for persistence and export.
//!
//! # Invariants
//! - Every task and goal is identified by a stable UUID.
//! - Derived fields (`UserStats`) are recomputed by services, never by callers.

pub mod goal;
pub mod progress;
pub mod sigil;
pub mod task;
pub mod user;
