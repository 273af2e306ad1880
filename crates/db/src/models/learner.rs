//! Learner profile records.

use chrono::NaiveDate;
use mambo_core::leveling::STARTING_LEVEL;
use mambo_core::progression::Learner;
use mambo_core::types::EntityId;
use serde::Serialize;

/// Gamification state stored per learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnerProfile {
    pub id: EntityId,
    pub xp: u64,
    pub level: u32,
    pub streak_count: u32,
    pub last_active_on: Option<NaiveDate>,
}

impl LearnerProfile {
    /// Profile for an identity seen for the first time.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            xp: 0,
            level: STARTING_LEVEL,
            streak_count: 0,
            last_active_on: None,
        }
    }

    /// The subset the progression rules need.
    pub fn learner(&self) -> Learner {
        Learner {
            id: self.id,
            xp: self.xp,
            level: self.level,
        }
    }
}

/// Result of an idempotent completion write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRecord {
    /// `false` when this completion key had already been stored.
    pub newly_recorded: bool,
    /// `true` when this write moved the stored level up.
    pub leveled_up: bool,
    /// The profile after the write (unchanged when not newly recorded).
    pub profile: LearnerProfile,
}
