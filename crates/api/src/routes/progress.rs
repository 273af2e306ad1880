//! Route definitions for lesson completion and the learner profile.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// POST   /lessons/{lesson_id}/complete   complete_lesson
/// GET    /me                             get_my_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/lessons/{lesson_id}/complete",
            post(progress::complete_lesson),
        )
        .route("/me", get(progress::get_my_progress))
}
