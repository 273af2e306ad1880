use axum::routing::post;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// POST   /                               submit_boss_battle
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submissions::submit_boss_battle))
}
