//! Flutter-facing bindings for the mastery core.

pub mod api;
