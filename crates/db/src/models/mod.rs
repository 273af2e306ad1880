//! Record and DTO types exchanged with a [`DataSource`](crate::DataSource).

pub mod course;
pub mod learner;
pub mod stats;
pub mod submission;
