use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mambo_api::config::ServerConfig;
use mambo_api::router::build_app_router;
use mambo_api::state::AppState;
use mambo_core::leveling::LinearCurve;
use mambo_db::{MemoryStore, SharedDataSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mambo_api=debug,mambo_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let level_curve =
        LinearCurve::new(config.xp_per_level).expect("XP_PER_LEVEL must be greater than zero");

    // --- Data source ---
    let store = if config.seed_demo_catalog {
        let (worlds, lessons) = mambo_db::seed::demo_catalog();
        tracing::info!(
            worlds = worlds.len(),
            lessons = lessons.len(),
            "Seeding demo catalog"
        );
        MemoryStore::with_catalog(worlds, lessons)
    } else {
        MemoryStore::new()
    };
    let data: SharedDataSource = Arc::new(store);

    mambo_db::health_check(data.as_ref())
        .await
        .expect("Data source health check failed");
    tracing::info!("Data source health check passed");

    // --- Event bus ---
    let event_bus = Arc::new(mambo_events::EventBus::default());
    let event_log_handle = tokio::spawn(mambo_events::log_events(event_bus.subscribe()));
    tracing::info!("Event bus created");

    // --- App state ---
    let state = AppState {
        data,
        config: Arc::new(config.clone()),
        level_curve: Arc::new(level_curve),
        event_bus: Arc::clone(&event_bus),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router (and its state clone) is gone; dropping the last sender
    // closes the channel so the log subscriber drains and exits.
    drop(event_bus);
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        event_log_handle,
    )
    .await;
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
