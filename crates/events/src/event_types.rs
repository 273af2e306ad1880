//! Well-known event type names.

/// A learner completed a lesson (self-completion or approved boss battle).
pub const LESSON_COMPLETED: &str = "lesson.completed";

/// A completion moved the learner to a higher level.
pub const LEARNER_LEVELED_UP: &str = "learner.leveled_up";

/// A learner submitted a boss-battle video.
pub const SUBMISSION_CREATED: &str = "submission.created";

/// An instructor approved a submission or requested a redo.
pub const SUBMISSION_GRADED: &str = "submission.graded";
