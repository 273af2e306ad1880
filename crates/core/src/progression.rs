//! Progression tracker: lesson lock state, world progress, next-lesson
//! routing, and XP/level awards on lesson completion.
//!
//! Every function here is pure. Lock state is always recomputed from the
//! completion flags and never stored, so a lesson moves from locked to
//! unlocked only because its predecessor was completed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::leveling::{LevelCurve, STARTING_LEVEL};
use crate::types::EntityId;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// A lesson as seen by one learner.
///
/// `is_completed` comes from the data source. `is_locked` is derived by
/// [`compute_lock_state`]; whatever value the caller passes in is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: EntityId,
    pub order_index: i32,
    pub xp_value: u32,
    pub is_boss_battle: bool,
    pub is_completed: bool,
    #[serde(default)]
    pub is_locked: bool,
}

/// Per-learner lesson state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Locked,
    UnlockedIncomplete,
    Completed,
}

impl Lesson {
    /// Status of an annotated lesson. Completion wins over the lock flag.
    pub fn status(&self) -> LessonStatus {
        if self.is_completed {
            LessonStatus::Completed
        } else if self.is_locked {
            LessonStatus::Locked
        } else {
            LessonStatus::UnlockedIncomplete
        }
    }
}

/// The learner fields progression cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: EntityId,
    pub xp: u64,
    pub level: u32,
}

impl Learner {
    /// A learner who has not earned anything yet.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            xp: 0,
            level: STARTING_LEVEL,
        }
    }

    /// The learner after a completion has been persisted.
    pub fn with_completion(&self, completion: &LessonCompletion) -> Self {
        Self {
            id: self.id,
            xp: completion.new_total_xp,
            level: completion.new_level,
        }
    }
}

/// Idempotency key for persisting a completion. A completion must be
/// stored at most once per key, however many times the request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionKey {
    pub learner_id: EntityId,
    pub lesson_id: EntityId,
}

/// Outcome of [`complete_lesson`], handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompletion {
    pub key: CompletionKey,
    pub xp_gained: u32,
    pub new_total_xp: u64,
    pub leveled_up: bool,
    pub new_level: u32,
}

/* --------------------------------------------------------------------------
Lock state and world progress
-------------------------------------------------------------------------- */

/// Annotate each lesson with `is_locked`.
///
/// `lessons` must already be ordered by `order_index`. The first lesson is
/// never locked, a completed lesson is never locked, and any other lesson is
/// locked exactly when its predecessor is not completed.
pub fn compute_lock_state(lessons: &[Lesson]) -> Vec<Lesson> {
    lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| {
            let is_locked = match i {
                0 => false,
                _ if lesson.is_completed => false,
                _ => !lessons[i - 1].is_completed,
            };
            Lesson {
                is_locked,
                ..lesson.clone()
            }
        })
        .collect()
}

/// Percentage of completed lessons, in `[0, 100]`. An empty world is 0%.
pub fn world_progress(lessons: &[Lesson]) -> f64 {
    if lessons.is_empty() {
        return 0.0;
    }
    let completed = lessons.iter().filter(|l| l.is_completed).count();
    100.0 * completed as f64 / lessons.len() as f64
}

/// The lesson a "continue" action should open.
///
/// Returns the first unlocked, incomplete lesson; failing that the first
/// lesson of the world; `None` only for an empty world. Expects lessons
/// annotated by [`compute_lock_state`].
pub fn first_actionable_lesson(lessons: &[Lesson]) -> Option<&Lesson> {
    lessons
        .iter()
        .find(|l| !l.is_locked && !l.is_completed)
        .or_else(|| lessons.first())
}

/// Ids of the lessons immediately before and after `lesson_id`.
///
/// Returns `None` when `lesson_id` is not part of `lessons`.
pub fn adjacent_lessons(
    lessons: &[Lesson],
    lesson_id: EntityId,
) -> Option<(Option<EntityId>, Option<EntityId>)> {
    let index = lessons.iter().position(|l| l.id == lesson_id)?;
    let prev = index.checked_sub(1).map(|i| lessons[i].id);
    let next = lessons.get(index + 1).map(|l| l.id);
    Some((prev, next))
}

/// Reject access to a locked lesson.
pub fn ensure_lesson_accessible(lesson: &Lesson) -> Result<(), CoreError> {
    if lesson.status() == LessonStatus::Locked {
        return Err(CoreError::Forbidden(
            "Please complete the previous lesson first.".to_string(),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Completion
-------------------------------------------------------------------------- */

/// Compute the XP award and level transition for completing `lesson`.
///
/// Fails with [`CoreError::AlreadyCompleted`] when the lesson is already
/// completed, so XP is never awarded twice. Nothing is mutated; the result
/// must be persisted under its [`CompletionKey`].
pub fn complete_lesson(
    lesson: &Lesson,
    learner: &Learner,
    curve: &dyn LevelCurve,
) -> Result<LessonCompletion, CoreError> {
    if lesson.is_completed {
        return Err(CoreError::AlreadyCompleted {
            lesson_id: lesson.id,
        });
    }

    let new_total_xp = learner.xp.saturating_add(u64::from(lesson.xp_value));
    let previous_level = curve.level_for(learner.xp);
    let new_level = curve.level_for(new_total_xp);

    Ok(LessonCompletion {
        key: CompletionKey {
            learner_id: learner.id,
            lesson_id: lesson.id,
        },
        xp_gained: lesson.xp_value,
        new_total_xp,
        leveled_up: new_level > previous_level,
        new_level,
    })
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
