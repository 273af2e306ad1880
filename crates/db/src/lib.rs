//! Data access for the Mambo progression service.
//!
//! [`DataSource`] is the single capability set handlers receive; nothing
//! else in the workspace talks to storage. [`MemoryStore`] is the in-process
//! implementation used by the server and the test suites.

pub mod memory;
pub mod models;
pub mod seed;
pub mod source;

pub use memory::MemoryStore;
pub use source::{DataSource, SharedDataSource};

/// Cheap liveness check for a data source.
pub async fn health_check(source: &dyn DataSource) -> Result<(), mambo_core::error::CoreError> {
    source.list_worlds().await.map(|_| ())
}
