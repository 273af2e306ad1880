//! Admin handlers: the boss-battle grading queue, dashboard stats and
//! curriculum editing.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use mambo_core::curriculum::{validate_slug, validate_title, validate_xp_value};
use mambo_core::error::CoreError;
use mambo_core::grading::{self, GradingQueue, Submission, SubmissionStatus};
use mambo_core::types::EntityId;
use mambo_db::models::course::{CreateLesson, CreateWorld, UpdateWorld};
use mambo_db::models::submission::GradeRequest;
use mambo_events::event_types::SUBMISSION_GRADED;
use mambo_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::access::ensure_lesson_exists;
use crate::handlers::progress::{award_completion, CompletionOutcome};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Grading queue
-------------------------------------------------------------------------- */

/// Query parameters for `GET /admin/submissions`.
#[derive(Debug, Deserialize)]
pub struct QueueParams {
    /// Move the cursor to this submission instead of the oldest one.
    pub selected: Option<EntityId>,
}

/// One row of the grading queue.
#[derive(Debug, Serialize)]
pub struct QueueItem {
    #[serde(flatten)]
    pub submission: Submission,
    /// Title of the boss-battle lesson, when the lesson still exists.
    pub lesson_title: Option<String>,
}

/// The instructor's queue with its selection cursor.
#[derive(Debug, Serialize)]
pub struct QueueView {
    pub selected_id: Option<EntityId>,
    pub total: usize,
    pub items: Vec<QueueItem>,
}

/// Outcome of a grading decision.
#[derive(Debug, Serialize)]
pub struct GradeOutcome {
    pub submission: Submission,
    /// Completion awarded to the learner on approval.
    pub completion: Option<CompletionOutcome>,
    /// The submission the instructor should review next.
    pub next_submission_id: Option<EntityId>,
}

async fn pending_queue(state: &AppState) -> AppResult<GradingQueue> {
    let pending = state.data.list_pending_submissions().await?;
    Ok(GradingQueue::new(pending))
}

async fn queue_view(state: &AppState, queue: &GradingQueue) -> AppResult<QueueView> {
    let mut titles: HashMap<EntityId, Option<String>> = HashMap::new();
    let mut items = Vec::with_capacity(queue.len());

    for submission in queue.items() {
        let lesson_title = match titles.get(&submission.lesson_id) {
            Some(title) => title.clone(),
            None => {
                let title = state
                    .data
                    .get_lesson(submission.lesson_id)
                    .await?
                    .map(|l| l.title);
                titles.insert(submission.lesson_id, title.clone());
                title
            }
        };
        items.push(QueueItem {
            submission: submission.clone(),
            lesson_title,
        });
    }

    Ok(QueueView {
        selected_id: queue.selected().map(|s| s.id),
        total: queue.len(),
        items,
    })
}

/// GET /api/v1/admin/submissions
///
/// Pending boss-battle submissions, oldest first. The oldest is selected
/// unless `?selected=<id>` names another pending submission.
pub async fn get_grading_queue(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
) -> AppResult<impl IntoResponse> {
    let mut queue = pending_queue(&state).await?;
    if let Some(selected) = params.selected {
        queue = queue.select(selected)?;
    }

    let view = queue_view(&state, &queue).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/admin/submissions/{id}/grade
///
/// Approve a submission or request a redo. Approval completes the boss
/// battle for the learner and awards its XP once. Grading a submission that
/// is no longer pending fails with 409 `INVALID_STATE`.
pub async fn grade_submission(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<GradeRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let submission = state
        .data
        .get_submission(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Submission",
            id,
        })?;
    let queue = pending_queue(&state).await?;

    let graded = grading::grade(&submission, input.decision, &input.feedback_text)?
        .reviewed(admin.user_id, Utc::now());

    // Resolve everything the award needs before the grade is persisted, so
    // a failed lookup leaves the submission pending and gradable.
    let award = if graded.status == SubmissionStatus::Approved {
        let lesson = ensure_lesson_exists(&state, graded.lesson_id).await?;
        let completed = state.data.completed_lessons(graded.learner_id).await?;
        Some(lesson.to_progress(completed.contains(&lesson.id)))
    } else {
        None
    };

    let saved = state.data.save_graded_submission(&graded).await?;

    let completion = match award {
        Some(view) => match award_completion(&state, saved.learner_id, &view).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(
                    submission_id = %id,
                    learner_id = %saved.learner_id,
                    error = %e,
                    "Approved submission saved but completion award failed"
                );
                return Err(e);
            }
        },
        None => None,
    };

    let next_submission_id = queue.after_grading(id).selected().map(|s| s.id);

    tracing::info!(
        user_id = %admin.user_id,
        submission_id = %id,
        learner_id = %saved.learner_id,
        status = saved.status.as_str(),
        "Submission graded"
    );

    state.event_bus.publish(
        PlatformEvent::new(SUBMISSION_GRADED)
            .with_source("submission", id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({
                "learner_id": saved.learner_id,
                "status": saved.status.as_str(),
            })),
    );

    Ok(Json(DataResponse {
        data: GradeOutcome {
            submission: saved,
            completion,
            next_submission_id,
        },
    }))
}

/* --------------------------------------------------------------------------
Stats
-------------------------------------------------------------------------- */

/// GET /api/v1/admin/stats
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = state.data.admin_stats().await?;
    Ok(Json(DataResponse { data: stats }))
}

/* --------------------------------------------------------------------------
Curriculum editing
-------------------------------------------------------------------------- */

/// POST /api/v1/admin/worlds
pub async fn create_world(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateWorld>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_title(&input.title)?;
    validate_slug(&input.slug)?;

    let world = state.data.create_world(&input).await?;

    tracing::info!(
        user_id = %admin.user_id,
        world_id = %world.id,
        slug = %world.slug,
        "World created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: world })))
}

/// PUT /api/v1/admin/worlds/{world_id}
///
/// Partial update; absent fields keep their stored values.
pub async fn update_world(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(world_id): Path<EntityId>,
    Json(input): Json<UpdateWorld>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(title) = &input.title {
        validate_title(title)?;
    }

    let world = state
        .data
        .update_world(world_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "World",
                id: world_id,
            })
        })?;

    tracing::info!(user_id = %admin.user_id, world_id = %world_id, "World updated");

    Ok(Json(DataResponse { data: world }))
}

/// POST /api/v1/admin/worlds/{world_id}/lessons
///
/// Adds a lesson to a world. `order_index` must be unused within the world.
pub async fn create_lesson(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(world_id): Path<EntityId>,
    Json(input): Json<CreateLesson>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_title(&input.title)?;
    validate_xp_value(input.xp_value)?;

    let lesson = state.data.create_lesson(world_id, &input).await?;

    tracing::info!(
        user_id = %admin.user_id,
        world_id = %world_id,
        lesson_id = %lesson.id,
        is_boss_battle = lesson.is_boss_battle,
        "Lesson created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}
