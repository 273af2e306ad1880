//! Handlers for lesson completion and the learner profile.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use mambo_core::error::CoreError;
use mambo_core::progression::{self, complete_lesson as compute_completion};
use mambo_core::types::EntityId;
use mambo_db::models::learner::LearnerProfile;
use mambo_events::event_types::{LEARNER_LEVELED_UP, LESSON_COMPLETED};
use mambo_events::PlatformEvent;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::access::{load_lesson_world, LearnerContext};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a completion attempt as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    pub lesson_id: EntityId,
    /// `0` when the lesson had already been completed.
    pub xp_gained: u32,
    pub total_xp: u64,
    pub level: u32,
    pub leveled_up: bool,
    pub streak_count: u32,
    pub already_completed: bool,
}

impl CompletionOutcome {
    fn unchanged(lesson_id: EntityId, profile: &LearnerProfile) -> Self {
        Self {
            lesson_id,
            xp_gained: 0,
            total_xp: profile.xp,
            level: profile.level,
            leveled_up: false,
            streak_count: profile.streak_count,
            already_completed: true,
        }
    }
}

/// Complete `lesson` for `learner_id` and persist the result once.
///
/// Completing an already completed lesson is a no-op that reports
/// `xp_gained: 0`. Shared by the completion endpoint and boss-battle
/// approval.
pub(crate) async fn award_completion(
    state: &AppState,
    learner_id: EntityId,
    lesson: &progression::Lesson,
) -> AppResult<CompletionOutcome> {
    let profile = state.data.get_learner(learner_id).await?;

    let completion = match compute_completion(lesson, &profile.learner(), &*state.level_curve) {
        Ok(completion) => completion,
        Err(CoreError::AlreadyCompleted { .. }) => {
            return Ok(CompletionOutcome::unchanged(lesson.id, &profile));
        }
        Err(e) => return Err(e.into()),
    };

    let record = state
        .data
        .record_completion(&completion, &*state.level_curve, Utc::now())
        .await?;
    if !record.newly_recorded {
        return Ok(CompletionOutcome::unchanged(lesson.id, &record.profile));
    }

    tracing::info!(
        learner_id = %learner_id,
        lesson_id = %lesson.id,
        xp_gained = completion.xp_gained,
        total_xp = record.profile.xp,
        level = record.profile.level,
        "Lesson completed"
    );

    state.event_bus.publish(
        PlatformEvent::new(LESSON_COMPLETED)
            .with_source("lesson", lesson.id)
            .with_actor(learner_id)
            .with_payload(serde_json::json!({
                "xp_gained": completion.xp_gained,
                "total_xp": record.profile.xp,
            })),
    );
    if record.leveled_up {
        state.event_bus.publish(
            PlatformEvent::new(LEARNER_LEVELED_UP)
                .with_source("learner", learner_id)
                .with_actor(learner_id)
                .with_payload(serde_json::json!({ "level": record.profile.level })),
        );
    }

    Ok(CompletionOutcome {
        lesson_id: lesson.id,
        xp_gained: completion.xp_gained,
        total_xp: record.profile.xp,
        level: record.profile.level,
        leveled_up: record.leveled_up,
        streak_count: record.profile.streak_count,
        already_completed: false,
    })
}

/// POST /api/v1/progress/lessons/{lesson_id}/complete
///
/// Mark an unlocked lesson as completed and award its XP. Boss battles are
/// completed through submission approval instead.
pub async fn complete_lesson(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let ctx = LearnerContext::load(&state, &auth).await?;
    let world = load_lesson_world(&state, &ctx, lesson_id).await?;
    let (_, lesson) = world.open_lesson(lesson_id)?;

    if lesson.is_boss_battle && !lesson.is_completed {
        return Err(AppError::Core(CoreError::Validation(
            "Boss battles are completed by submitting a video for review".to_string(),
        )));
    }

    let outcome = award_completion(&state, auth.user_id, lesson).await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// The learner profile plus the number of completed lessons.
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    #[serde(flatten)]
    pub profile: LearnerProfile,
    pub completed_lessons: usize,
}

/// GET /api/v1/progress/me
pub async fn get_my_progress(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = state.data.get_learner(auth.user_id).await?;
    let completed_lessons = state.data.completed_lessons(auth.user_id).await?.len();

    Ok(Json(DataResponse {
        data: ProgressSummary {
            profile,
            completed_lessons,
        },
    }))
}
