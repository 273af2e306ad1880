//! Handlers for the learner-facing curriculum views.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use mambo_core::error::CoreError;
use mambo_core::progression::{adjacent_lessons, first_actionable_lesson, world_progress};
use mambo_core::types::EntityId;
use mambo_db::models::course::{Lesson, World};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::access::{
    load_catalog, load_lesson_world, load_world, LearnerContext, WorldState,
};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A lesson as presented to one learner.
#[derive(Debug, Serialize)]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub is_completed: bool,
    pub is_locked: bool,
}

/// A world card in the catalog listing.
#[derive(Debug, Serialize)]
pub struct WorldSummary {
    #[serde(flatten)]
    pub world: World,
    /// Percentage of the world's lessons the learner completed.
    pub progress: f64,
    pub is_locked: bool,
    pub lesson_count: usize,
}

/// The lesson list of one world.
#[derive(Debug, Serialize)]
pub struct WorldLessons {
    pub world: World,
    pub progress: f64,
    pub is_locked: bool,
    /// Target of the "continue" action; `None` only for an empty world.
    pub first_actionable_lesson_id: Option<EntityId>,
    pub lessons: Vec<LessonView>,
}

/// A single lesson with navigation to its neighbours.
#[derive(Debug, Serialize)]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: LessonView,
    pub prev_lesson_id: Option<EntityId>,
    pub next_lesson_id: Option<EntityId>,
}

fn lesson_views(state: &WorldState) -> Vec<LessonView> {
    state
        .lessons
        .iter()
        .zip(&state.progress)
        .map(|(lesson, view)| LessonView {
            lesson: lesson.clone(),
            is_completed: view.is_completed,
            is_locked: view.is_locked,
        })
        .collect()
}

/// GET /api/v1/courses/worlds
///
/// Published worlds in catalog order with the learner's progress and lock
/// flag.
pub async fn list_worlds(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ctx = LearnerContext::load(&state, &auth).await?;
    let catalog = load_catalog(&state, &ctx).await?;

    let summaries: Vec<WorldSummary> = catalog
        .into_iter()
        .map(|w| WorldSummary {
            progress: world_progress(&w.progress),
            is_locked: w.is_locked,
            lesson_count: w.lessons.len(),
            world: w.world,
        })
        .collect();

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/courses/worlds/{world_id}/lessons
///
/// Lessons of one world with lock state, world progress and the first
/// actionable lesson.
pub async fn list_world_lessons(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(world_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let ctx = LearnerContext::load(&state, &auth).await?;
    let world = load_world(&state, &ctx, world_id).await?;

    let data = WorldLessons {
        progress: world_progress(&world.progress),
        is_locked: world.is_locked,
        first_actionable_lesson_id: first_actionable_lesson(&world.progress).map(|l| l.id),
        lessons: lesson_views(&world),
        world: world.world,
    };

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/courses/lessons/{lesson_id}
///
/// Lesson detail with previous/next ids. Locked lessons are rejected with
/// 403.
pub async fn get_lesson(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let ctx = LearnerContext::load(&state, &auth).await?;
    let world = load_lesson_world(&state, &ctx, lesson_id).await?;
    let (lesson, view) = world.open_lesson(lesson_id)?;

    let (prev_lesson_id, next_lesson_id) =
        adjacent_lessons(&world.progress, lesson_id).ok_or(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        })?;

    let data = LessonDetail {
        lesson: LessonView {
            lesson: lesson.clone(),
            is_completed: view.is_completed,
            is_locked: view.is_locked,
        },
        prev_lesson_id,
        next_lesson_id,
    };

    Ok(Json(DataResponse { data }))
}
