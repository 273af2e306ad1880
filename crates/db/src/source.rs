//! The injected data-access capability set.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mambo_core::error::CoreError;
use mambo_core::grading::Submission;
use mambo_core::leveling::LevelCurve;
use mambo_core::progression::LessonCompletion;
use mambo_core::types::{EntityId, Timestamp};

use crate::models::course::{CreateLesson, CreateWorld, Lesson, UpdateWorld, World};
use crate::models::learner::{CompletionRecord, LearnerProfile};
use crate::models::stats::AdminStats;
use crate::models::submission::CreateSubmission;

/// Shared handle to a data source, as held by the application state.
pub type SharedDataSource = Arc<dyn DataSource>;

/// Everything the service reads from or writes to the authoritative store.
///
/// Implementations own validation that needs the full data set (uniqueness,
/// foreign keys, idempotency). Pure rule checks stay in `mambo-core`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /* ----------------------------- curriculum ----------------------------- */

    /// All worlds ordered by `order_index`.
    async fn list_worlds(&self) -> Result<Vec<World>, CoreError>;

    async fn get_world(&self, world_id: EntityId) -> Result<Option<World>, CoreError>;

    /// Lessons of one world ordered by `order_index`.
    async fn list_world_lessons(&self, world_id: EntityId) -> Result<Vec<Lesson>, CoreError>;

    async fn get_lesson(&self, lesson_id: EntityId) -> Result<Option<Lesson>, CoreError>;

    /// Fails with `Conflict` on a duplicate slug.
    async fn create_world(&self, input: &CreateWorld) -> Result<World, CoreError>;

    async fn update_world(
        &self,
        world_id: EntityId,
        input: &UpdateWorld,
    ) -> Result<Option<World>, CoreError>;

    /// Fails with `NotFound` for an unknown world and `Conflict` for a taken
    /// `order_index`.
    async fn create_lesson(
        &self,
        world_id: EntityId,
        input: &CreateLesson,
    ) -> Result<Lesson, CoreError>;

    /* ----------------------------- progress ------------------------------- */

    /// The learner's profile, created on first sight.
    async fn get_learner(&self, learner_id: EntityId) -> Result<LearnerProfile, CoreError>;

    async fn completed_lessons(&self, learner_id: EntityId)
        -> Result<HashSet<EntityId>, CoreError>;

    /// Lessons for which the learner has an approved boss submission.
    async fn approved_lessons(&self, learner_id: EntityId) -> Result<HashSet<EntityId>, CoreError>;

    /// Persist a completion at most once per `completion.key`.
    ///
    /// The first call marks the lesson completed and applies the XP delta
    /// and streak change. The stored level is `curve.level_for` of the XP
    /// actually stored, and `leveled_up` compares it with the level held
    /// before the write. Repeated calls with the same key change nothing and
    /// report `newly_recorded: false`.
    async fn record_completion(
        &self,
        completion: &LessonCompletion,
        curve: &dyn LevelCurve,
        completed_at: Timestamp,
    ) -> Result<CompletionRecord, CoreError>;

    /* ----------------------------- submissions ---------------------------- */

    /// Every pending submission, in no particular order.
    async fn list_pending_submissions(&self) -> Result<Vec<Submission>, CoreError>;

    async fn get_submission(&self, submission_id: EntityId)
        -> Result<Option<Submission>, CoreError>;

    /// Store a new pending submission. Fails with `Conflict` when the learner
    /// already has an approved or pending submission for the lesson.
    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, CoreError>;

    /// Replace a pending submission with its graded copy. Fails with
    /// `InvalidState` when the stored copy was already graded.
    async fn save_graded_submission(&self, graded: &Submission) -> Result<Submission, CoreError>;

    /* ----------------------------- admin ---------------------------------- */

    async fn admin_stats(&self) -> Result<AdminStats, CoreError>;
}
