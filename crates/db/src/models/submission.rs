//! Boss-battle submission DTOs.
//!
//! The stored record itself is [`mambo_core::grading::Submission`].

use mambo_core::grading::GradeDecision;
use mambo_core::types::EntityId;
use serde::Deserialize;
use validator::Validate;

/// DTO for storing a new pending submission.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub learner_id: EntityId,
    pub lesson_id: EntityId,
    pub video_url: String,
}

/// Request body for the learner submit endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequest {
    pub lesson_id: EntityId,
    #[validate(length(min = 1, max = 2048))]
    pub video_url: String,
}

/// Request body for the admin grade endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeRequest {
    pub decision: GradeDecision,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub feedback_text: String,
}
