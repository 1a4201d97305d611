//! Notification pushes end to end: service -> event bus -> router -> table
//! -> `/notifications` endpoints.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post, post_json, seed_project, TestUser};
use praxis_api::notifications::NotificationRouter;
use sqlx::PgPool;
use uuid::Uuid;

/// Poll the unread count until it reaches `expected`; the router stores
/// pushes asynchronously.
async fn wait_for_unread(app: axum::Router, user: &TestUser, expected: i64) {
    let mut count = -1;
    for _ in 0..50 {
        let response = get(app.clone(), "/api/v1/notifications/unread-count", Some(&user.token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        count = body_json(response).await["data"]["count"].as_i64().unwrap();
        if count == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("unread count stuck at {count}, expected {expected}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pushes_are_stored_and_listed(pool: PgPool) {
    let app = build_test_app(pool.clone());
    tokio::spawn(NotificationRouter::new(pool.clone()).run(app.state.event_bus.subscribe()));

    let student = common::student();
    let project = seed_project(&pool, Uuid::new_v4(), "Notified").await;

    let response = post_json(
        app.app(),
        "/api/v1/bookmarks",
        Some(&student.token),
        serde_json::json!({ "project_id": project.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    wait_for_unread(app.app(), &student, 1).await;

    let response = get(app.app(), "/api/v1/notifications", Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["meta"]["total"], 1);
    let item = &json["data"]["items"][0];
    assert_eq!(item["title"], "Saved to bookmarks");
    assert_eq!(item["data"]["project_id"], project.id.to_string());
    assert_eq!(item["is_read"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_is_per_user_and_once(pool: PgPool) {
    let app = build_test_app(pool.clone());
    tokio::spawn(NotificationRouter::new(pool.clone()).run(app.state.event_bus.subscribe()));

    let student = common::student();
    let project = seed_project(&pool, Uuid::new_v4(), "Read me").await;
    post_json(
        app.app(),
        "/api/v1/bookmarks",
        Some(&student.token),
        serde_json::json!({ "project_id": project.id }),
    )
    .await;
    wait_for_unread(app.app(), &student, 1).await;

    let json = body_json(get(app.app(), "/api/v1/notifications", Some(&student.token)).await).await;
    let id = json["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let stranger = common::student();
    let response = post(app.app(), &format!("/api/v1/notifications/{id}/read"), Some(&stranger.token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post(app.app(), &format!("/api/v1/notifications/{id}/read"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    wait_for_unread(app.app(), &student, 0).await;

    let response = post(app.app(), &format!("/api/v1/notifications/{id}/read"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_all_clears_unread(pool: PgPool) {
    let app = build_test_app(pool.clone());
    tokio::spawn(NotificationRouter::new(pool.clone()).run(app.state.event_bus.subscribe()));

    let student = common::student();
    for title in ["First", "Second"] {
        let project = seed_project(&pool, Uuid::new_v4(), title).await;
        post_json(
            app.app(),
            "/api/v1/bookmarks",
            Some(&student.token),
            serde_json::json!({ "project_id": project.id }),
        )
        .await;
    }
    wait_for_unread(app.app(), &student, 2).await;

    let response = post(app.app(), "/api/v1/notifications/read-all", Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["marked_read"], 2);

    let response = get(
        app.app(),
        "/api/v1/notifications?unread_only=true",
        Some(&student.token),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["meta"]["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_require_a_token(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/api/v1/notifications", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
