//! Route definitions for the learner-facing curriculum views.

use axum::routing::get;
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /worlds                         list_worlds
/// GET    /worlds/{world_id}/lessons      list_world_lessons
/// GET    /lessons/{lesson_id}            get_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/worlds", get(courses::list_worlds))
        .route("/worlds/{world_id}/lessons", get(courses::list_world_lessons))
        .route("/lessons/{lesson_id}", get(courses::get_lesson))
}
