//! Mambo domain core.
//!
//! Pure progression and grading rules shared by every caller (HTTP handlers,
//! background jobs, tooling). Nothing in this crate performs I/O; every
//! operation takes a snapshot of state and returns a new one.

pub mod curriculum;
pub mod error;
pub mod grading;
pub mod leveling;
pub mod progression;
pub mod roles;
pub mod streak;
pub mod types;
