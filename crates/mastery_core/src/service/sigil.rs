//! Sigil evolution rules.
//!
//! # Responsibility
//! - Build the evolution event applied when a task is completed.
//! - Derive the design token from aspect totals.
//!
//! # Invariants
//! - `design_token` is a pure function of the aspects.
//! - The token index saturates at `MAX_DESIGN_INDEX`.

use crate::model::sigil::{Aspect, Aspects, SigilEvolution};
use chrono::{DateTime, Utc};

pub const DESIGN_TOKEN_PREFIX: &str = "sigil-";
/// Aspect total at which design complexity saturates.
pub const DESIGN_SATURATION_TOTAL: u64 = 10;
pub const MAX_DESIGN_INDEX: u64 = 10;

/// Evolution granted for completing a task.
pub fn task_completion_evolution(task_title: &str, at: DateTime<Utc>) -> SigilEvolution {
    SigilEvolution {
        aspect: Aspect::Discipline,
        change: 1,
        reason: format!("Completed task: {task_title}"),
        timestamp: at,
    }
}

/// Returns `sigil-N` with `N = floor(min(total / 10, 1) * 10)`.
///
/// Aspects are integers, so the floor is exact in integer arithmetic.
pub fn design_token(aspects: &Aspects) -> String {
    let saturated = aspects.total().min(DESIGN_SATURATION_TOTAL);
    let index = saturated * MAX_DESIGN_INDEX / DESIGN_SATURATION_TOTAL;
    format!("{DESIGN_TOKEN_PREFIX}{index}")
}
