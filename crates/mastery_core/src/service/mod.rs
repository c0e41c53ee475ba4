//! Core use-case services.
//!
//! # Responsibility
//! - Apply user actions to the aggregate through the state store.
//! - Keep derivation rules (stats, sigil, achievements) out of the model.
//!
//! # See also
//! - `repo` for the persistence provider the store writes through.

pub mod achievements;
pub mod removal;
pub mod sigil;
pub mod stats;
pub mod store;
