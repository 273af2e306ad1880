//! XP-to-level curves.
//!
//! The leveling table is owned by product, not by the progression rules, so
//! the tracker only ever sees a [`LevelCurve`]. Two curves ship here:
//! [`LinearCurve`] (one level per fixed XP step, the production default) and
//! [`ThresholdTable`] (explicit `min_xp -> level` breakpoints).

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// XP required per level in the default linear curve.
pub const DEFAULT_XP_PER_LEVEL: u64 = 1_000;

/// The level every learner starts at.
pub const STARTING_LEVEL: u32 = 1;

/* --------------------------------------------------------------------------
Trait
-------------------------------------------------------------------------- */

/// Maps a cumulative XP total to a level.
///
/// Implementations must be pure and monotonically non-decreasing in `xp`,
/// and must return at least [`STARTING_LEVEL`].
pub trait LevelCurve: Send + Sync {
    fn level_for(&self, xp: u64) -> u32;
}

impl<F> LevelCurve for F
where
    F: Fn(u64) -> u32 + Send + Sync,
{
    fn level_for(&self, xp: u64) -> u32 {
        self(xp)
    }
}

/* --------------------------------------------------------------------------
Linear curve
-------------------------------------------------------------------------- */

/// `level = floor(xp / xp_per_level) + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCurve {
    xp_per_level: u64,
}

impl LinearCurve {
    /// Build a linear curve. `xp_per_level` must be positive.
    pub fn new(xp_per_level: u64) -> Result<Self, CoreError> {
        if xp_per_level == 0 {
            return Err(CoreError::Validation(
                "xp_per_level must be greater than zero".to_string(),
            ));
        }
        Ok(Self { xp_per_level })
    }

    pub fn xp_per_level(&self) -> u64 {
        self.xp_per_level
    }
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self {
            xp_per_level: DEFAULT_XP_PER_LEVEL,
        }
    }
}

impl LevelCurve for LinearCurve {
    fn level_for(&self, xp: u64) -> u32 {
        let steps = xp / self.xp_per_level;
        u32::try_from(steps)
            .unwrap_or(u32::MAX - STARTING_LEVEL)
            .saturating_add(STARTING_LEVEL)
    }
}

/* --------------------------------------------------------------------------
Threshold table
-------------------------------------------------------------------------- */

/// Explicit breakpoints: a learner is at the highest level whose `min_xp`
/// they have reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    /// `(min_xp, level)` pairs, sorted by `min_xp` ascending.
    thresholds: Vec<(u64, u32)>,
}

impl ThresholdTable {
    /// Build a table from `(min_xp, level)` pairs in any order.
    ///
    /// The table must start at 0 XP, and levels must strictly increase with XP.
    pub fn new(mut thresholds: Vec<(u64, u32)>) -> Result<Self, CoreError> {
        thresholds.sort_by_key(|(min_xp, _)| *min_xp);

        match thresholds.first() {
            Some((0, level)) if *level >= STARTING_LEVEL => {}
            Some(_) => {
                return Err(CoreError::Validation(
                    "Level table must start at 0 XP with a level of at least 1".to_string(),
                ))
            }
            None => {
                return Err(CoreError::Validation(
                    "Level table must not be empty".to_string(),
                ))
            }
        }

        for pair in thresholds.windows(2) {
            let (prev_xp, prev_level) = pair[0];
            let (xp, level) = pair[1];
            if xp == prev_xp {
                return Err(CoreError::Validation(format!(
                    "Duplicate level threshold at {xp} XP"
                )));
            }
            if level <= prev_level {
                return Err(CoreError::Validation(format!(
                    "Level {level} at {xp} XP does not exceed level {prev_level} at {prev_xp} XP"
                )));
            }
        }

        Ok(Self { thresholds })
    }
}

impl LevelCurve for ThresholdTable {
    fn level_for(&self, xp: u64) -> u32 {
        self.thresholds
            .iter()
            .take_while(|(min_xp, _)| *min_xp <= xp)
            .last()
            .map_or(STARTING_LEVEL, |(_, level)| *level)
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
