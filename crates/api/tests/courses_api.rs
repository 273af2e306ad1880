//! HTTP-level integration tests for the learner curriculum views.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get_as, post_as, seeded_app, Identity};
use mambo_core::grading::{Submission, SubmissionStatus};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// World listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_learner_sees_free_world_open_and_paid_world_locked() {
    let seeded = seeded_app();
    let student = Identity::student();

    let response = get_as(seeded.app.clone(), "/api/v1/courses/worlds", &student).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let worlds = json["data"].as_array().unwrap();
    assert_eq!(worlds.len(), 2);

    assert_eq!(worlds[0]["slug"], "mambo-basics");
    assert_eq!(worlds[0]["is_locked"], false);
    assert_eq!(worlds[0]["progress"], 0.0);
    assert_eq!(worlds[0]["lesson_count"], 5);

    assert_eq!(worlds[1]["slug"], "shines-footwork");
    assert_eq!(worlds[1]["is_locked"], true);
}

#[tokio::test]
async fn subscription_alone_does_not_open_world_after_unbeaten_boss() {
    let seeded = seeded_app();
    let student = Identity::student().subscribed();

    let json =
        body_json(get_as(seeded.app.clone(), "/api/v1/courses/worlds", &student).await).await;
    assert_eq!(json["data"][1]["is_locked"], true);
}

#[tokio::test]
async fn approved_boss_and_subscription_open_next_world() {
    let seeded = seeded_app();
    let student = Identity::student().subscribed();
    let boss = seeded.lessons_of(0).last().cloned().unwrap();

    seeded
        .store
        .insert_submission(Submission {
            id: Uuid::new_v4(),
            learner_id: student.user_id,
            lesson_id: boss.id,
            video_url: "https://videos.example.com/boss.mp4".to_string(),
            status: SubmissionStatus::Approved,
            submitted_at: Utc::now(),
            feedback: Some("Great timing".to_string()),
            reviewed_at: Some(Utc::now()),
            reviewed_by: Some(Uuid::new_v4()),
        })
        .await;

    let json =
        body_json(get_as(seeded.app.clone(), "/api/v1/courses/worlds", &student).await).await;
    assert_eq!(json["data"][1]["is_locked"], false);

    // Without the subscription the paid world stays locked.
    let unsubscribed = Identity {
        subscription_active: false,
        ..student
    };
    let json =
        body_json(get_as(seeded.app.clone(), "/api/v1/courses/worlds", &unsubscribed).await).await;
    assert_eq!(json["data"][1]["is_locked"], true);
}

// ---------------------------------------------------------------------------
// Lesson listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_first_lesson_is_unlocked_for_fresh_learner() {
    let seeded = seeded_app();
    let student = Identity::student();
    let world_id = seeded.worlds[0].id;
    let lessons = seeded.lessons_of(0);

    let uri = format!("/api/v1/courses/worlds/{world_id}/lessons");
    let response = get_as(seeded.app.clone(), &uri, &student).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    let locks: Vec<bool> = data["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["is_locked"].as_bool().unwrap())
        .collect();

    assert_eq!(locks, vec![false, true, true, true, true]);
    assert_eq!(data["progress"], 0.0);
    assert_eq!(data["first_actionable_lesson_id"], lessons[0].id.to_string());
    assert_eq!(data["lessons"][0]["title"], "Finding the Clave");
}

#[tokio::test]
async fn completing_a_lesson_unlocks_the_next_one() {
    let seeded = seeded_app();
    let student = Identity::student();
    let world_id = seeded.worlds[0].id;
    let lessons = seeded.lessons_of(0);

    let complete = format!("/api/v1/progress/lessons/{}/complete", lessons[0].id);
    assert_eq!(post_as(seeded.app.clone(), &complete, &student).await.status(), StatusCode::OK);

    let uri = format!("/api/v1/courses/worlds/{world_id}/lessons");
    let json = body_json(get_as(seeded.app.clone(), &uri, &student).await).await;
    let data = &json["data"];

    assert_eq!(data["lessons"][0]["is_completed"], true);
    assert_eq!(data["lessons"][1]["is_locked"], false);
    assert_eq!(data["lessons"][2]["is_locked"], true);
    assert_eq!(data["progress"], 20.0);
    assert_eq!(data["first_actionable_lesson_id"], lessons[1].id.to_string());
}

#[tokio::test]
async fn unknown_world_returns_404() {
    let seeded = seeded_app();
    let uri = format!("/api/v1/courses/worlds/{}/lessons", Uuid::new_v4());

    let response = get_as(seeded.app.clone(), &uri, &Identity::student()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_world_id_is_rejected() {
    let seeded = seeded_app();

    let response = get_as(
        seeded.app.clone(),
        "/api/v1/courses/worlds/not-a-uuid/lessons",
        &Identity::student(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Lesson detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lesson_detail_links_to_neighbours() {
    let seeded = seeded_app();
    let lessons = seeded.lessons_of(0);

    let uri = format!("/api/v1/courses/lessons/{}", lessons[0].id);
    let response = get_as(seeded.app.clone(), &uri, &Identity::student()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], lessons[0].id.to_string());
    assert!(json["data"]["prev_lesson_id"].is_null());
    assert_eq!(json["data"]["next_lesson_id"], lessons[1].id.to_string());
}

#[tokio::test]
async fn locked_lesson_detail_is_forbidden() {
    let seeded = seeded_app();
    let lessons = seeded.lessons_of(0);

    let uri = format!("/api/v1/courses/lessons/{}", lessons[1].id);
    let response = get_as(seeded.app.clone(), &uri, &Identity::student()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Please complete the previous lesson first.");
}

#[tokio::test]
async fn lesson_in_locked_world_is_forbidden() {
    let seeded = seeded_app();
    let paid_first = seeded.lessons_of(1)[0].clone();

    let uri = format!("/api/v1/courses/lessons/{}", paid_first.id);
    let response = get_as(seeded.app.clone(), &uri, &Identity::student()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
