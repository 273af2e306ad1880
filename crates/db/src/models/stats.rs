//! Admin dashboard counters.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_learners: usize,
    pub pending_submissions: usize,
    pub total_worlds: usize,
    pub total_lessons: usize,
}
