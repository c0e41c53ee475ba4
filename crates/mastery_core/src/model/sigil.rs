//! Sigil domain model.
//!
//! # Responsibility
//! - Hold the five mastery aspect scores and their evolution history.
//! - Map aspect totals to sigil level bands.
//!
//! # Invariants
//! - Aspect scores never go below zero; decreases saturate at zero.
//! - `level` is stored state; it only changes when a caller asks for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Total aspect score at which each level band starts.
pub const APPRENTICE_THRESHOLD: u64 = 10;
pub const ADEPT_THRESHOLD: u64 = 25;
pub const MASTER_THRESHOLD: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Discipline,
    Knowledge,
    Creativity,
    Physical,
    Spiritual,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Discipline,
        Aspect::Knowledge,
        Aspect::Creativity,
        Aspect::Physical,
        Aspect::Spiritual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discipline => "discipline",
            Self::Knowledge => "knowledge",
            Self::Creativity => "creativity",
            Self::Physical => "physical",
            Self::Spiritual => "spiritual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|aspect| aspect.as_str() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigilLevel {
    #[default]
    Novice,
    Apprentice,
    Adept,
    Master,
}

impl SigilLevel {
    /// Level band for a total aspect score.
    pub fn for_total_score(total: u64) -> Self {
        match total {
            t if t >= MASTER_THRESHOLD => Self::Master,
            t if t >= ADEPT_THRESHOLD => Self::Adept,
            t if t >= APPRENTICE_THRESHOLD => Self::Apprentice,
            _ => Self::Novice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Aspects {
    pub discipline: u32,
    pub knowledge: u32,
    pub creativity: u32,
    pub physical: u32,
    pub spiritual: u32,
}

impl Aspects {
    pub fn get(&self, aspect: Aspect) -> u32 {
        match aspect {
            Aspect::Discipline => self.discipline,
            Aspect::Knowledge => self.knowledge,
            Aspect::Creativity => self.creativity,
            Aspect::Physical => self.physical,
            Aspect::Spiritual => self.spiritual,
        }
    }

    fn slot_mut(&mut self, aspect: Aspect) -> &mut u32 {
        match aspect {
            Aspect::Discipline => &mut self.discipline,
            Aspect::Knowledge => &mut self.knowledge,
            Aspect::Creativity => &mut self.creativity,
            Aspect::Physical => &mut self.physical,
            Aspect::Spiritual => &mut self.spiritual,
        }
    }

    /// Adds a signed change to one aspect, saturating at `0` and `u32::MAX`.
    pub fn apply(&mut self, aspect: Aspect, change: i32) {
        let slot = self.slot_mut(aspect);
        *slot = if change >= 0 {
            slot.saturating_add(change.unsigned_abs())
        } else {
            slot.saturating_sub(change.unsigned_abs())
        };
    }

    pub fn total(&self) -> u64 {
        Aspect::ALL
            .into_iter()
            .map(|aspect| u64::from(self.get(aspect)))
            .sum()
    }
}

/// Immutable record of one aspect change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigilEvolution {
    pub aspect: Aspect,
    pub change: i32,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigilState {
    pub level: SigilLevel,
    pub aspects: Aspects,
    /// Opaque design token chosen by the caller.
    pub current_design: String,
    pub evolution_history: Vec<SigilEvolution>,
}

impl SigilState {
    /// Applies one evolution and appends it to history. Leaves `level` as is.
    pub fn evolve(&mut self, evolution: SigilEvolution) {
        self.aspects.apply(evolution.aspect, evolution.change);
        self.evolution_history.push(evolution);
    }
}
