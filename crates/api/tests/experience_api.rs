//! HTTP-level integration tests for the `/experiences` endpoints.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{body_json, build_test_app, delete, get, post, post_json, put_json, TestUser};
use praxis_core::experience::STATUS_PUBLISHED;
use praxis_db::repositories::experience_repo::ExperienceFields;
use praxis_db::repositories::ExperienceRepo;
use sqlx::PgPool;
use uuid::Uuid;

async fn create_experience(app: axum::Router, student: &TestUser, title: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/experiences",
        Some(&student.token),
        serde_json::json!({
            "title": title,
            "start_date": "2025-01-01",
            "tags": ["backend"],
        }),
    )
    .await
}

async fn draft_id(app: axum::Router, student: &TestUser, title: &str) -> String {
    let response = create_experience(app, student, title).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Insert published experiences directly, bypassing the draft quota.
async fn seed_published(pool: &PgPool, student_id: Uuid, count: usize) {
    let tags: Vec<String> = Vec::new();
    for i in 0..count {
        let title = format!("Published {i}");
        let fields = ExperienceFields {
            title: &title,
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            tags: &tags,
        };
        let created = ExperienceRepo::create(pool, student_id, &fields).await.unwrap();
        ExperienceRepo::set_status(pool, created.id, STATUS_PUBLISHED)
            .await
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_as_draft(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();

    let response = post_json(
        app.app(),
        "/api/v1/experiences",
        Some(&student.token),
        serde_json::json!({
            "title": " Internship ",
            "start_date": "2024-06-01",
            "end_date": "2024-09-01",
            "tags": ["Rust", "rust", " "],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Internship");
    assert_eq!(json["data"]["status"], "DRAFT");
    assert_eq!(json["data"]["created_by"], student.id.to_string());
    assert_eq!(json["data"]["tags"], serde_json::json!(["Rust"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn end_before_start_is_a_validation_error(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();

    let response = post_json(
        app.app(),
        "/api/v1/experiences",
        Some(&student.token),
        serde_json::json!({
            "title": "Backwards",
            "start_date": "2024-06-01",
            "end_date": "2024-05-01",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["context"]["errors"][0]["field"], "end_date");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sixth_draft_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();

    for i in 0..5 {
        draft_id(app.app(), &student, &format!("Draft {i}")).await;
    }
    let response = create_experience(app.app(), &student, "One too many").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "OPERATION_NOT_ALLOWED");
    assert_eq!(json["context"]["limit"], 5);

    // The quota is per student.
    let other = common::student();
    let response = create_experience(app.app(), &other, "Someone else").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clients_cannot_create_experiences(pool: PgPool) {
    let app = build_test_app(pool);
    let client = common::client();

    let response = create_experience(app.app(), &client, "Not a student").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_respects_published_quota(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let student = common::student();
    seed_published(&pool, student.id, 10).await;
    let id = draft_id(app.app(), &student, "Eleventh").await;

    let response = post(
        app.app(),
        &format!("/api/v1/experiences/{id}/publish"),
        Some(&student.token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "OPERATION_NOT_ALLOWED");
    assert_eq!(json["context"]["limit"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_archive_unarchive_round_trip(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Lifecycle").await;

    let response = post(app.app(), &format!("/api/v1/experiences/{id}/publish"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "PUBLISHED");

    // Publishing twice is a state error, not a quota error.
    let response = post(app.app(), &format!("/api/v1/experiences/{id}/publish"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post(app.app(), &format!("/api/v1/experiences/{id}/archive"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "ARCHIVED");

    let response = post(app.app(), &format!("/api/v1/experiences/{id}/unarchive"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "DRAFT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublish_returns_to_draft(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Second thoughts").await;

    // Only published experiences can be unpublished.
    let response = post(app.app(), &format!("/api/v1/experiences/{id}/unpublish"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");

    post(app.app(), &format!("/api/v1/experiences/{id}/publish"), Some(&student.token)).await;
    let response = post(app.app(), &format!("/api/v1/experiences/{id}/unpublish"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "DRAFT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublish_requires_draft_room(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Published first").await;
    post(app.app(), &format!("/api/v1/experiences/{id}/publish"), Some(&student.token)).await;
    for i in 0..5 {
        draft_id(app.app(), &student, &format!("Draft {i}")).await;
    }

    let response = post(app.app(), &format!("/api/v1/experiences/{id}/unpublish"), Some(&student.token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "OPERATION_NOT_ALLOWED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unarchive_requires_draft_room(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let archived = draft_id(app.app(), &student, "Archived").await;
    let response = post(
        app.app(),
        &format!("/api/v1/experiences/{archived}/archive"),
        Some(&student.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for i in 0..5 {
        draft_id(app.app(), &student, &format!("Draft {i}")).await;
    }

    let response = post(
        app.app(),
        &format!("/api/v1/experiences/{archived}/unarchive"),
        Some(&student.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unarchive_requires_archived(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Still a draft").await;

    let response = post(
        app.app(),
        &format!("/api/v1/experiences/{id}/unarchive"),
        Some(&student.token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");
}

// ---------------------------------------------------------------------------
// Update / ownership / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_checks_merged_dates(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Dated").await;

    // Stored start is 2025-01-01.
    let response = put_json(
        app.app(),
        &format!("/api/v1/experiences/{id}"),
        Some(&student.token),
        serde_json::json!({ "end_date": "2024-12-31" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        app.app(),
        &format!("/api/v1/experiences/{id}"),
        Some(&student.token),
        serde_json::json!({ "end_date": "2025-03-01", "title": "Dated and done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Dated and done");
    assert_eq!(json["data"]["end_date"], "2025-03-01");
    assert_eq!(json["data"]["tags"], serde_json::json!(["backend"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_null_clears_optional_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let id = draft_id(app.app(), &student, "Ongoing").await;
    let uri = format!("/api/v1/experiences/{id}");

    let response = put_json(
        app.app(),
        &uri,
        Some(&student.token),
        serde_json::json!({ "end_date": "2025-06-01", "description": "Six months" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Omitted fields keep their stored value.
    let response = put_json(app.app(), &uri, Some(&student.token), serde_json::json!({ "title": "Renamed" })).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["end_date"], "2025-06-01");
    assert_eq!(json["data"]["description"], "Six months");

    let response = put_json(
        app.app(),
        &uri,
        Some(&student.token),
        serde_json::json!({ "end_date": null, "description": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["end_date"], serde_json::Value::Null);
    assert_eq!(json["data"]["description"], serde_json::Value::Null);
    assert_eq!(json["data"]["title"], "Renamed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_students_are_forbidden(pool: PgPool) {
    let app = build_test_app(pool);
    let owner = common::student();
    let intruder = common::student();
    let id = draft_id(app.app(), &owner, "Private").await;

    let response = get(app.app(), &format!("/api/v1/experiences/{id}"), Some(&intruder.token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(
        app.app(),
        &format!("/api/v1/experiences/{}", Uuid::new_v4()),
        Some(&owner.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let published = draft_id(app.app(), &student, "Shown").await;
    draft_id(app.app(), &student, "Hidden").await;
    post(
        app.app(),
        &format!("/api/v1/experiences/{published}/publish"),
        Some(&student.token),
    )
    .await;

    let response = get(app.app(), "/api/v1/experiences?status=PUBLISHED", Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["meta"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "Shown");

    let response = get(app.app(), "/api/v1/experiences?status=bogus", Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_frees_a_draft_slot(pool: PgPool) {
    let app = build_test_app(pool);
    let student = common::student();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(draft_id(app.app(), &student, &format!("Draft {i}")).await);
    }

    let response = delete(app.app(), &format!("/api/v1/experiences/{}", ids[0]), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = create_experience(app.app(), &student, "Fits again").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
