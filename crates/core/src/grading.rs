//! Boss-battle submission grading and the instructor grading queue.
//!
//! The queue is FIFO by `submitted_at` so the oldest waiting learner is
//! reviewed first. After a decision the cursor moves to the submission that
//! followed the graded one, wrapping to the head when the last item was
//! graded, and clearing when nothing is left.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Submission lifecycle. `Pending` moves to one of the other two exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

/// Instructor decision on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeDecision {
    Approve,
    RequestRedo,
}

impl GradeDecision {
    /// Status a submission ends up in after this decision.
    pub fn resulting_status(self) -> SubmissionStatus {
        match self {
            GradeDecision::Approve => SubmissionStatus::Approved,
            GradeDecision::RequestRedo => SubmissionStatus::Rejected,
        }
    }
}

/// A learner's boss-battle video awaiting or having received review.
///
/// `feedback` is `None` until graded and `Some` (possibly empty) afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: EntityId,
    pub learner_id: EntityId,
    pub lesson_id: EntityId,
    pub video_url: String,
    pub status: SubmissionStatus,
    pub submitted_at: Timestamp,
    pub feedback: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub reviewed_by: Option<EntityId>,
}

impl Submission {
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    /// Stamp reviewer and review time onto a graded copy.
    pub fn reviewed(self, reviewer_id: EntityId, reviewed_at: Timestamp) -> Self {
        Self {
            reviewed_by: Some(reviewer_id),
            reviewed_at: Some(reviewed_at),
            ..self
        }
    }
}

/* --------------------------------------------------------------------------
Grading
-------------------------------------------------------------------------- */

/// Apply a grading decision to a pending submission.
///
/// Returns a new record; the input is untouched. Grading anything that is
/// not pending fails with [`CoreError::InvalidState`].
pub fn grade(
    submission: &Submission,
    decision: GradeDecision,
    feedback_text: &str,
) -> Result<Submission, CoreError> {
    if !submission.is_pending() {
        return Err(CoreError::InvalidState {
            submission_id: submission.id,
            status: submission.status.as_str(),
        });
    }

    Ok(Submission {
        status: decision.resulting_status(),
        feedback: Some(feedback_text.to_string()),
        ..submission.clone()
    })
}

/// Pending submissions in FIFO review order (oldest first, ties by id).
pub fn order_queue(submissions: impl IntoIterator<Item = Submission>) -> Vec<Submission> {
    let mut queue: Vec<Submission> = submissions
        .into_iter()
        .filter(Submission::is_pending)
        .collect();
    queue.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    queue
}

/// The submission to select once `graded_id` leaves `queue`.
///
/// `queue` is the ordering before removal. The result is the item right
/// after `graded_id`, else the first remaining item, else `None`. If
/// `graded_id` is not in the queue nothing is removed and the head is
/// selected.
pub fn select_next(queue: &[Submission], graded_id: EntityId) -> Option<&Submission> {
    let Some(index) = queue.iter().position(|s| s.id == graded_id) else {
        return queue.first();
    };

    queue
        .get(index + 1)
        .or_else(|| queue.iter().find(|s| s.id != graded_id))
}

/* --------------------------------------------------------------------------
GradingQueue
-------------------------------------------------------------------------- */

/// Snapshot of the instructor's queue with a single selection cursor.
///
/// Transitions return new snapshots instead of mutating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingQueue {
    items: Vec<Submission>,
    selected: Option<EntityId>,
}

impl GradingQueue {
    /// Build a queue from fetched submissions, selecting the oldest.
    pub fn new(submissions: impl IntoIterator<Item = Submission>) -> Self {
        let items = order_queue(submissions);
        let selected = items.first().map(|s| s.id);
        Self { items, selected }
    }

    pub fn items(&self) -> &[Submission] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The currently selected submission, if any.
    pub fn selected(&self) -> Option<&Submission> {
        let id = self.selected?;
        self.items.iter().find(|s| s.id == id)
    }

    /// Move the cursor to `submission_id`.
    pub fn select(&self, submission_id: EntityId) -> Result<Self, CoreError> {
        if !self.items.iter().any(|s| s.id == submission_id) {
            return Err(CoreError::NotFound {
                entity: "Submission",
                id: submission_id,
            });
        }
        Ok(Self {
            items: self.items.clone(),
            selected: Some(submission_id),
        })
    }

    /// Decisions may only be taken on the selected submission.
    pub fn ensure_selected(&self, submission_id: EntityId) -> Result<(), CoreError> {
        if self.selected == Some(submission_id) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Submission {submission_id} is not the selected submission"
            )))
        }
    }

    /// Remove `graded_id` and advance the cursor per [`select_next`].
    pub fn after_grading(&self, graded_id: EntityId) -> Self {
        let selected = select_next(&self.items, graded_id).map(|s| s.id);
        let items = self
            .items
            .iter()
            .filter(|s| s.id != graded_id)
            .cloned()
            .collect();
        Self { items, selected }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn pending_at(hour: u32, minute: u32) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            learner_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            video_url: "https://videos.example.com/boss.mp4".to_string(),
            status: SubmissionStatus::Pending,
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap(),
            feedback: None,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    /// A(10:00), B(10:05), C(10:10).
    fn abc() -> Vec<Submission> {
        vec![pending_at(10, 0), pending_at(10, 5), pending_at(10, 10)]
    }

    // -----------------------------------------------------------------------
    // grade
    // -----------------------------------------------------------------------

    #[test]
    fn approve_sets_status_and_feedback() {
        let sub = pending_at(10, 0);
        let graded = grade(&sub, GradeDecision::Approve, "Great timing").unwrap();
        assert_eq!(graded.status, SubmissionStatus::Approved);
        assert_eq!(graded.feedback.as_deref(), Some("Great timing"));
        assert_eq!(graded.id, sub.id);
        assert!(sub.is_pending(), "input must not be mutated");
    }

    #[test]
    fn request_redo_rejects_with_empty_feedback() {
        let graded = grade(&pending_at(10, 0), GradeDecision::RequestRedo, "").unwrap();
        assert_eq!(graded.status, SubmissionStatus::Rejected);
        assert_eq!(graded.feedback.as_deref(), Some(""));
    }

    #[test]
    fn grading_twice_is_invalid_state() {
        let sub = pending_at(10, 0);
        let graded = grade(&sub, GradeDecision::Approve, "ok").unwrap();
        assert_matches!(
            grade(&graded, GradeDecision::RequestRedo, "again"),
            Err(CoreError::InvalidState { status: "approved", .. })
        );
    }

    #[test]
    fn reviewed_stamps_reviewer() {
        let reviewer = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        let graded = grade(&pending_at(10, 0), GradeDecision::Approve, "")
            .unwrap()
            .reviewed(reviewer, at);
        assert_eq!(graded.reviewed_by, Some(reviewer));
        assert_eq!(graded.reviewed_at, Some(at));
    }

    // -----------------------------------------------------------------------
    // order_queue / select_next
    // -----------------------------------------------------------------------

    #[test]
    fn queue_is_oldest_first_and_pending_only() {
        let [a, b, c]: [Submission; 3] = abc().try_into().unwrap();
        let done = grade(&pending_at(9, 0), GradeDecision::Approve, "").unwrap();
        let queue = order_queue(vec![c.clone(), done, a.clone(), b.clone()]);
        let ids: Vec<_> = queue.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn grading_middle_selects_following_item() {
        let queue = abc();
        assert_eq!(select_next(&queue, queue[1].id).map(|s| s.id), Some(queue[2].id));
    }

    #[test]
    fn grading_first_selects_second() {
        let queue = abc();
        assert_eq!(select_next(&queue, queue[0].id).map(|s| s.id), Some(queue[1].id));
    }

    #[test]
    fn grading_last_wraps_to_first_remaining() {
        let queue = abc();
        assert_eq!(select_next(&queue, queue[2].id).map(|s| s.id), Some(queue[0].id));
    }

    #[test]
    fn grading_only_item_empties_selection() {
        let queue = vec![pending_at(10, 0)];
        assert!(select_next(&queue, queue[0].id).is_none());
    }

    #[test]
    fn unknown_graded_id_selects_head() {
        let queue = abc();
        assert_eq!(select_next(&queue, Uuid::new_v4()).map(|s| s.id), Some(queue[0].id));
        assert!(select_next(&[], Uuid::new_v4()).is_none());
    }

    // -----------------------------------------------------------------------
    // GradingQueue
    // -----------------------------------------------------------------------

    #[test]
    fn new_queue_selects_oldest() {
        let subs = abc();
        let oldest = subs[0].id;
        let queue = GradingQueue::new(subs.into_iter().rev());
        assert_eq!(queue.selected().map(|s| s.id), Some(oldest));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn empty_queue_has_no_selection() {
        let queue = GradingQueue::new(Vec::new());
        assert!(queue.is_empty());
        assert!(queue.selected().is_none());
    }

    #[test]
    fn grading_sequence_walks_then_wraps_then_empties() {
        let subs = abc();
        let (a, b, c) = (subs[0].id, subs[1].id, subs[2].id);
        let queue = GradingQueue::new(subs).select(b).unwrap();

        let queue = queue.after_grading(b);
        assert_eq!(queue.selected().map(|s| s.id), Some(c));
        assert_eq!(queue.len(), 2);

        let queue = queue.after_grading(c);
        assert_eq!(queue.selected().map(|s| s.id), Some(a));

        let queue = queue.after_grading(a);
        assert!(queue.is_empty());
        assert!(queue.selected().is_none());
    }

    #[test]
    fn after_grading_leaves_original_snapshot_untouched() {
        let queue = GradingQueue::new(abc());
        let head = queue.items()[0].id;
        let _next = queue.after_grading(head);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.selected().map(|s| s.id), Some(head));
    }

    #[test]
    fn selecting_unknown_submission_is_not_found() {
        let queue = GradingQueue::new(abc());
        assert_matches!(
            queue.select(Uuid::new_v4()),
            Err(CoreError::NotFound { entity: "Submission", .. })
        );
    }

    #[test]
    fn decisions_only_on_selected_submission() {
        let subs = abc();
        let queue = GradingQueue::new(subs.clone());
        assert!(queue.ensure_selected(subs[0].id).is_ok());
        assert!(queue.ensure_selected(subs[1].id).is_err());
    }
}
