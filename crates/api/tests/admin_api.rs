//! HTTP-level integration tests for admin curriculum editing and stats.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_as, post_as, post_json_as, put_json_as, seeded_app, Identity};
use serde_json::json;
use uuid::Uuid;

fn world_body(slug: &str) -> serde_json::Value {
    json!({
        "title": "Partnerwork",
        "slug": slug,
        "description": "Turn patterns with a partner",
        "difficulty": "Intermediate",
        "order_index": 3,
        "is_free": false,
        "is_published": true,
    })
}

fn lesson_body(order_index: i32) -> serde_json::Value {
    json!({
        "title": "Cross Body Lead",
        "video_url": "https://videos.example.com/cbl.mp4",
        "xp_value": 100,
        "order_index": order_index,
        "duration_minutes": 9,
    })
}

// ---------------------------------------------------------------------------
// Worlds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_creates_world() {
    let seeded = seeded_app();

    let response = post_json_as(
        seeded.app.clone(),
        "/api/v1/admin/worlds",
        world_body("partnerwork"),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "partnerwork");
    assert_eq!(json["data"]["difficulty"], "Intermediate");
    assert_eq!(json["data"]["is_free"], false);
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
    let seeded = seeded_app();

    let response = post_json_as(
        seeded.app.clone(),
        "/api/v1/admin/worlds",
        world_body("mambo-basics"),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_slug_is_rejected() {
    let seeded = seeded_app();

    let response = post_json_as(
        seeded.app.clone(),
        "/api/v1/admin/worlds",
        world_body("Partner Work"),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let seeded = seeded_app();
    let mut body = world_body("partnerwork");
    body["title"] = json!("   ");

    let response =
        post_json_as(seeded.app.clone(), "/api/v1/admin/worlds", body, &Identity::admin()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_world_changes_only_given_fields() {
    let seeded = seeded_app();
    let world = &seeded.worlds[1];

    let response = put_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{}", world.id),
        json!({ "is_free": true }),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["is_free"], true);
    assert_eq!(json["data"]["title"], world.title.as_str());

    // A now-free world is open to everyone.
    let worlds = body_json(
        get_as(seeded.app.clone(), "/api/v1/courses/worlds", &Identity::student()).await,
    )
    .await;
    assert_eq!(worlds["data"][1]["is_locked"], false);
}

#[tokio::test]
async fn update_unknown_world_returns_404() {
    let seeded = seeded_app();

    let response = put_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{}", Uuid::new_v4()),
        json!({ "title": "Renamed" }),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unpublished_worlds_are_hidden_from_learners() {
    let seeded = seeded_app();
    let mut body = world_body("drafts");
    body["is_published"] = json!(false);
    body["is_free"] = json!(true);

    let response =
        post_json_as(seeded.app.clone(), "/api/v1/admin/worlds", body, &Identity::admin()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let worlds = body_json(
        get_as(seeded.app.clone(), "/api/v1/courses/worlds", &Identity::student()).await,
    )
    .await;
    assert_eq!(worlds["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Lessons
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_adds_lesson_to_world() {
    let seeded = seeded_app();
    let world_id = seeded.worlds[0].id;

    let response = post_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{world_id}/lessons"),
        lesson_body(6),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["world_id"], world_id.to_string());
    assert_eq!(json["data"]["xp_value"], 100);
    assert_eq!(json["data"]["is_boss_battle"], false);
}

#[tokio::test]
async fn lesson_xp_defaults_when_omitted() {
    let seeded = seeded_app();
    let world_id = seeded.worlds[0].id;
    let mut body = lesson_body(7);
    body.as_object_mut().unwrap().remove("xp_value");

    let response = post_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{world_id}/lessons"),
        body,
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["xp_value"], 50);
}

#[tokio::test]
async fn taken_order_index_conflicts() {
    let seeded = seeded_app();
    let world_id = seeded.worlds[0].id;

    let response = post_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{world_id}/lessons"),
        lesson_body(1),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn excessive_xp_is_rejected() {
    let seeded = seeded_app();
    let world_id = seeded.worlds[0].id;
    let mut body = lesson_body(6);
    body["xp_value"] = json!(20_000);

    let response = post_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{world_id}/lessons"),
        body,
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lesson_for_unknown_world_returns_404() {
    let seeded = seeded_app();

    let response = post_json_as(
        seeded.app.clone(),
        &format!("/api/v1/admin/worlds/{}/lessons", Uuid::new_v4()),
        lesson_body(1),
        &Identity::admin(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Stats and RBAC
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_count_catalog_and_learners() {
    let seeded = seeded_app();
    let student = Identity::student();
    let first = seeded.lessons_of(0)[0].id;
    post_as(
        seeded.app.clone(),
        &format!("/api/v1/progress/lessons/{first}/complete"),
        &student,
    )
    .await;

    let response = get_as(seeded.app.clone(), "/api/v1/admin/stats", &Identity::admin()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_worlds"], 2);
    assert_eq!(json["data"]["total_lessons"], 8);
    assert_eq!(json["data"]["total_learners"], 1);
    assert_eq!(json["data"]["pending_submissions"], 0);
}

#[tokio::test]
async fn student_cannot_edit_curriculum() {
    let seeded = seeded_app();

    let response = post_json_as(
        seeded.app.clone(),
        "/api/v1/admin/worlds",
        world_body("sneaky"),
        &Identity::student(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}
