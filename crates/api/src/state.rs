use std::sync::Arc;

use mambo_core::leveling::LevelCurve;
use mambo_db::SharedDataSource;
use mambo_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The injected data-access capability set.
    pub data: SharedDataSource,
    pub config: Arc<ServerConfig>,
    /// XP-to-level curve used for every completion.
    pub level_curve: Arc<dyn LevelCurve>,
    /// Event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
}
