//! Curriculum constants, world access rules, and editing validation.
//!
//! Used by the admin course builder (world/lesson creation) and by the
//! course listing to decide whether a whole world is open to a learner.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for world and lesson titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum XP a single lesson may award.
pub const MAX_LESSON_XP: u32 = 10_000;

/// XP awarded by a lesson when the builder does not specify one.
pub const DEFAULT_LESSON_XP: u32 = 50;

/* --------------------------------------------------------------------------
Difficulty
-------------------------------------------------------------------------- */

/// World difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/* --------------------------------------------------------------------------
World access
-------------------------------------------------------------------------- */

/// Inputs needed to decide whether a world is open to a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldAccess {
    /// Free worlds are open to everyone.
    pub is_free: bool,
    /// Whether the learner holds an active subscription.
    pub subscription_active: bool,
    /// Whether this world is the first in catalog order.
    pub is_first: bool,
    /// `None` when the previous world has no boss battle; otherwise whether
    /// the learner's boss submission for it has been approved.
    pub previous_boss_approved: Option<bool>,
}

/// Whether a world is locked for a learner.
///
/// Paid worlds need an active subscription, and every paid world after the
/// first also needs the previous world's boss battle to have been approved.
pub fn world_is_locked(access: WorldAccess) -> bool {
    if access.is_free {
        return false;
    }
    if !access.subscription_active {
        return true;
    }
    !access.is_first && access.previous_boss_approved == Some(false)
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate a world or lesson title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a world slug: lowercase ASCII letters, digits and single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".to_string()));
    }

    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )));
    }

    Ok(())
}

/// Validate a lesson's XP reward.
pub fn validate_xp_value(xp_value: u32) -> Result<(), CoreError> {
    if xp_value > MAX_LESSON_XP {
        return Err(CoreError::Validation(format!(
            "xp_value {xp_value} exceeds maximum of {MAX_LESSON_XP}"
        )));
    }
    Ok(())
}

/// Reject an `order_index` already taken within the same world.
pub fn ensure_order_index_free(
    existing: impl IntoIterator<Item = i32>,
    order_index: i32,
) -> Result<(), CoreError> {
    if existing.into_iter().any(|taken| taken == order_index) {
        return Err(CoreError::Conflict(format!(
            "A lesson with order_index {order_index} already exists in this world"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
