//! Mambo event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`event_types`]: the event names published by the service.
//! - [`log_events`]: subscriber that writes every event to the log.

pub mod bus;
pub mod event_types;

pub use bus::{log_events, EventBus, PlatformEvent};
