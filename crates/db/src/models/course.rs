//! World and lesson records plus the course-builder DTOs.

use mambo_core::curriculum::{Difficulty, DEFAULT_LESSON_XP};
use mambo_core::progression;
use mambo_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored world (course module).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image_url: String,
    pub difficulty: Difficulty,
    pub order_index: i32,
    pub is_free: bool,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stored lesson within a world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lesson {
    pub id: EntityId,
    pub world_id: EntityId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub xp_value: u32,
    pub order_index: i32,
    pub is_boss_battle: bool,
    pub duration_minutes: u32,
    pub created_at: Timestamp,
}

impl Lesson {
    /// The learner-specific view used by the progression rules.
    ///
    /// `is_locked` is left `false`; run the result through
    /// [`progression::compute_lock_state`].
    pub fn to_progress(&self, is_completed: bool) -> progression::Lesson {
        progression::Lesson {
            id: self.id,
            order_index: self.order_index,
            xp_value: self.xp_value,
            is_boss_battle: self.is_boss_battle,
            is_completed,
            is_locked: false,
        }
    }
}

fn default_xp() -> u32 {
    DEFAULT_LESSON_XP
}

/// DTO for creating a world.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorld {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub difficulty: Difficulty,
    pub order_index: i32,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub is_published: bool,
}

/// DTO for updating a world. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorld {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub order_index: Option<i32>,
    pub is_free: Option<bool>,
    pub is_published: Option<bool>,
}

/// DTO for creating a lesson inside a world.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLesson {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub video_url: String,
    #[serde(default = "default_xp")]
    #[validate(range(max = 10000))]
    pub xp_value: u32,
    pub order_index: i32,
    #[serde(default)]
    pub is_boss_battle: bool,
    #[serde(default)]
    pub duration_minutes: u32,
}
