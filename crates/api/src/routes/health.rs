//! Root-level liveness route. Mounted outside `/api/v1` and needs no
//! identity headers.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the data source fails to answer.
    pub status: &'static str,
    pub version: &'static str,
    pub data_source_healthy: bool,
}

impl HealthReport {
    fn new(data_source_healthy: bool) -> Self {
        Self {
            status: if data_source_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            data_source_healthy,
        }
    }
}

async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let healthy = match mambo_db::health_check(state.data.as_ref()).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Data source health check failed");
            false
        }
    };
    Json(HealthReport::new(healthy))
}

/// ```text
/// GET /health  -> report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
