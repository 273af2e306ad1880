use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// `complete_lesson` was called for a lesson the learner already finished.
    /// XP must not be awarded again.
    #[error("Lesson {lesson_id} is already completed")]
    AlreadyCompleted { lesson_id: EntityId },

    /// A grading decision was attempted on a submission that is no longer pending.
    #[error("Submission {submission_id} is {status}, not pending")]
    InvalidState {
        submission_id: EntityId,
        status: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
