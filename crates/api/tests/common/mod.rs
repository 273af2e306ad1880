#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use mambo_api::config::ServerConfig;
use mambo_api::router::build_app_router;
use mambo_api::state::AppState;
use mambo_core::leveling::LinearCurve;
use mambo_db::models::course::{Lesson, World};
use mambo_db::{MemoryStore, SharedDataSource};
use mambo_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        xp_per_level: 1000,
        seed_demo_catalog: false,
    }
}

/// Build the full application router on top of `store`.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let data: SharedDataSource = store;

    let state = AppState {
        data,
        config: Arc::new(config.clone()),
        level_curve: Arc::new(LinearCurve::default()),
        event_bus: Arc::new(EventBus::default()),
    };

    build_app_router(state, &config)
}

/// The demo catalog loaded into a fresh store.
pub struct Seeded {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub worlds: Vec<World>,
    pub lessons: Vec<Lesson>,
}

impl Seeded {
    /// Lessons of `worlds[world_index]` in catalog order.
    pub fn lessons_of(&self, world_index: usize) -> Vec<Lesson> {
        let world_id = self.worlds[world_index].id;
        let mut lessons: Vec<Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.world_id == world_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }
}

/// An app seeded with the free "Mambo Basics" world (five lessons, the
/// last a boss battle) and the paid "Shines & Footwork" world.
pub fn seeded_app() -> Seeded {
    let (worlds, lessons) = mambo_db::seed::demo_catalog();
    let store = Arc::new(MemoryStore::with_catalog(worlds.clone(), lessons.clone()));
    Seeded {
        app: build_test_app(Arc::clone(&store)),
        store,
        worlds,
        lessons,
    }
}

/* --------------------------------------------------------------------------
Identity
-------------------------------------------------------------------------- */

/// Identity headers forwarded by the upstream authentication layer.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: &'static str,
    pub subscription_active: bool,
}

impl Identity {
    pub fn student() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: "student",
            subscription_active: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: "admin",
            subscription_active: false,
        }
    }

    pub fn subscribed(mut self) -> Self {
        self.subscription_active = true;
        self
    }
}

/* --------------------------------------------------------------------------
Request helpers
-------------------------------------------------------------------------- */

fn request(method: Method, uri: &str, identity: Option<&Identity>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(identity) = identity {
        builder = builder
            .header("x-user-id", identity.user_id.to_string())
            .header("x-user-role", identity.role)
            .header(
                "x-subscription-active",
                if identity.subscription_active { "true" } else { "false" },
            );
    }
    builder
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_as(app: Router, uri: &str, identity: &Identity) -> Response<Body> {
    send(
        app,
        request(Method::GET, uri, Some(identity))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// POST without a body.
pub async fn post_as(app: Router, uri: &str, identity: &Identity) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, Some(identity))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    identity: &Identity,
) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, Some(identity))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    identity: &Identity,
) -> Response<Body> {
    send(
        app,
        request(Method::PUT, uri, Some(identity))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
