//! Boss-battle video submissions.
//!
//! A learner submits once the boss battle is unlocked; instructors grade
//! the result through the admin queue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mambo_core::error::CoreError;
use mambo_db::models::submission::{CreateSubmission, SubmitRequest};
use mambo_events::event_types::SUBMISSION_CREATED;
use mambo_events::PlatformEvent;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::access::{load_lesson_world, LearnerContext};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/submissions
///
/// Submit a boss-battle video URL for instructor review. The lesson must be
/// a boss battle the learner has unlocked.
pub async fn submit_boss_battle(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let ctx = LearnerContext::load(&state, &auth).await?;
    let world = load_lesson_world(&state, &ctx, input.lesson_id).await?;
    let (lesson, _) = world.open_lesson(input.lesson_id)?;

    if !lesson.is_boss_battle {
        return Err(AppError::Core(CoreError::Validation(
            "Only boss battle lessons accept video submissions".to_string(),
        )));
    }

    let create = CreateSubmission {
        learner_id: auth.user_id,
        lesson_id: lesson.id,
        video_url: input.video_url.trim().to_string(),
    };
    let submission = state.data.create_submission(&create).await?;

    tracing::info!(
        user_id = %auth.user_id,
        lesson_id = %lesson.id,
        submission_id = %submission.id,
        "Boss battle submitted"
    );

    state.event_bus.publish(
        PlatformEvent::new(SUBMISSION_CREATED)
            .with_source("submission", submission.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "lesson_id": lesson.id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}
