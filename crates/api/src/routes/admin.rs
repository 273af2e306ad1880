//! Admin route definitions: grading queue, stats and curriculum editing.
//!
//! Every handler behind these routes requires the `admin` role via
//! [`RequireAdmin`](crate::middleware::rbac::RequireAdmin).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /submissions                    get_grading_queue
/// POST   /submissions/{id}/grade         grade_submission
/// GET    /stats                          get_stats
/// POST   /worlds                         create_world
/// PUT    /worlds/{world_id}              update_world
/// POST   /worlds/{world_id}/lessons      create_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(admin::get_grading_queue))
        .route("/submissions/{id}/grade", post(admin::grade_submission))
        .route("/stats", get(admin::get_stats))
        .route("/worlds", post(admin::create_world))
        .route("/worlds/{world_id}", put(admin::update_world))
        .route("/worlds/{world_id}/lessons", post(admin::create_lesson))
}
