//! Learner-specific view of the catalog shared by the learner handlers.
//!
//! Loads what a learner has completed and had approved, then derives world
//! and lesson lock state from the progression rules in `mambo_core`.

use std::collections::HashSet;

use mambo_core::curriculum::{world_is_locked, WorldAccess};
use mambo_core::error::CoreError;
use mambo_core::progression::{self, compute_lock_state, ensure_lesson_accessible};
use mambo_core::types::EntityId;
use mambo_db::models::course::{Lesson, World};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// What the data source knows about one learner's progress.
pub struct LearnerContext {
    pub learner_id: EntityId,
    pub subscription_active: bool,
    pub completed: HashSet<EntityId>,
    pub approved: HashSet<EntityId>,
}

impl LearnerContext {
    pub async fn load(state: &AppState, auth: &AuthUser) -> AppResult<Self> {
        let completed = state.data.completed_lessons(auth.user_id).await?;
        let approved = state.data.approved_lessons(auth.user_id).await?;
        Ok(Self {
            learner_id: auth.user_id,
            subscription_active: auth.subscription_active,
            completed,
            approved,
        })
    }

    /// Lessons of one world annotated for this learner, in catalog order.
    pub fn annotate(&self, lessons: &[Lesson]) -> Vec<progression::Lesson> {
        let plain: Vec<progression::Lesson> = lessons
            .iter()
            .map(|l| l.to_progress(self.completed.contains(&l.id)))
            .collect();
        compute_lock_state(&plain)
    }

    /// Whether `world` is locked, given the world right before it in
    /// catalog order and that world's lessons.
    pub fn world_locked(&self, world: &World, previous: Option<&[Lesson]>) -> bool {
        let previous_boss_approved = previous.and_then(|lessons| {
            lessons
                .iter()
                .rev()
                .find(|l| l.is_boss_battle)
                .map(|boss| self.approved.contains(&boss.id))
        });

        world_is_locked(WorldAccess {
            is_free: world.is_free,
            subscription_active: self.subscription_active,
            is_first: previous.is_none(),
            previous_boss_approved,
        })
    }
}

/// One world as seen by a learner.
pub struct WorldState {
    pub world: World,
    pub is_locked: bool,
    /// Stored lessons ordered by `order_index`.
    pub lessons: Vec<Lesson>,
    /// The same lessons annotated with completion and lock state.
    pub progress: Vec<progression::Lesson>,
}

impl WorldState {
    /// The stored lesson and its annotated view.
    pub fn find(&self, lesson_id: EntityId) -> Option<(&Lesson, &progression::Lesson)> {
        self.lessons
            .iter()
            .zip(&self.progress)
            .find(|(lesson, _)| lesson.id == lesson_id)
    }

    /// Like [`find`](Self::find) but rejects locked worlds and locked lessons.
    pub fn open_lesson(
        &self,
        lesson_id: EntityId,
    ) -> AppResult<(&Lesson, &progression::Lesson)> {
        if self.is_locked {
            return Err(AppError::Core(CoreError::Forbidden(
                "This world is locked.".to_string(),
            )));
        }
        let found = self.find(lesson_id).ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        })?;
        ensure_lesson_accessible(found.1)?;
        Ok(found)
    }
}

/// Published worlds in catalog order.
pub async fn published_worlds(state: &AppState) -> AppResult<Vec<World>> {
    let worlds = state.data.list_worlds().await?;
    Ok(worlds.into_iter().filter(|w| w.is_published).collect())
}

/// Every published world with its learner-specific state, in catalog order.
pub async fn load_catalog(state: &AppState, ctx: &LearnerContext) -> AppResult<Vec<WorldState>> {
    let worlds = published_worlds(state).await?;
    let mut catalog: Vec<WorldState> = Vec::with_capacity(worlds.len());

    for world in worlds {
        let lessons = state.data.list_world_lessons(world.id).await?;
        let previous = catalog.last().map(|w| w.lessons.as_slice());
        let is_locked = ctx.world_locked(&world, previous);
        let progress = ctx.annotate(&lessons);
        catalog.push(WorldState {
            world,
            is_locked,
            lessons,
            progress,
        });
    }

    Ok(catalog)
}

/// One published world with its learner-specific state.
///
/// Unpublished and unknown worlds are both reported as not found.
pub async fn load_world(
    state: &AppState,
    ctx: &LearnerContext,
    world_id: EntityId,
) -> AppResult<WorldState> {
    let worlds = published_worlds(state).await?;
    let index = worlds
        .iter()
        .position(|w| w.id == world_id)
        .ok_or(CoreError::NotFound {
            entity: "World",
            id: world_id,
        })?;

    let previous = match index.checked_sub(1) {
        Some(prev) => Some(state.data.list_world_lessons(worlds[prev].id).await?),
        None => None,
    };
    let lessons = state.data.list_world_lessons(world_id).await?;
    let world = worlds[index].clone();

    Ok(WorldState {
        is_locked: ctx.world_locked(&world, previous.as_deref()),
        progress: ctx.annotate(&lessons),
        world,
        lessons,
    })
}

/// Fetch a lesson by id, failing with `NotFound`.
pub async fn ensure_lesson_exists(state: &AppState, lesson_id: EntityId) -> AppResult<Lesson> {
    state
        .data
        .get_lesson(lesson_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Lesson",
                id: lesson_id,
            })
        })
}

/// The world holding `lesson_id`, as seen by the learner.
pub async fn load_lesson_world(
    state: &AppState,
    ctx: &LearnerContext,
    lesson_id: EntityId,
) -> AppResult<WorldState> {
    let lesson = ensure_lesson_exists(state, lesson_id).await?;
    load_world(state, ctx, lesson.world_id).await
}
