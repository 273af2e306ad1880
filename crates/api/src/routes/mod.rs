pub mod admin;
pub mod courses;
pub mod health;
pub mod progress;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /courses/worlds                                  worlds with progress and lock flag
/// /courses/worlds/{world_id}/lessons               lessons with lock state
/// /courses/lessons/{lesson_id}                     lesson detail with prev/next
///
/// /progress/lessons/{lesson_id}/complete           complete a lesson (POST)
/// /progress/me                                     learner xp, level, streak
///
/// /submissions                                     submit boss-battle video (POST)
///
/// /admin/submissions                               grading queue (admin only)
/// /admin/submissions/{id}/grade                    grade + next selection (POST)
/// /admin/stats                                     dashboard counters
/// /admin/worlds                                    create world (POST)
/// /admin/worlds/{world_id}                         update world (PUT)
/// /admin/worlds/{world_id}/lessons                 create lesson (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Learner-facing curriculum views.
        .nest("/courses", courses::router())
        // Completion and learner profile.
        .nest("/progress", progress::router())
        // Boss-battle submissions.
        .nest("/submissions", submissions::router())
        // Grading queue, stats and curriculum editing.
        .nest("/admin", admin::router())
}
