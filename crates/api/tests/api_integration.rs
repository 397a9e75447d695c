//! API integration tests.
//!
//! These tests drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use notehub_api::{AppState, router as api_router};
use notehub_common::LocalStorage;
use notehub_core::{
    CommentService, FeedbackService, MediaService, NoteService, RatingService, SemesterService,
    StatsService, SubjectService,
};
use notehub_db::entities::{
    feedback::{self, FeedbackType},
    note::{self, NoteType},
    rating, semester, subject,
};
use notehub_db::repositories::{
    CommentRepository, FeedbackRepository, NoteRepository, RatingRepository, SemesterRepository,
    SubjectRepository,
};
use sea_orm::{DatabaseConnection, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state over the given connection.
fn create_test_state(db: Arc<DatabaseConnection>) -> AppState {
    let semester_repo = SemesterRepository::new(Arc::clone(&db));
    let subject_repo = SubjectRepository::new(Arc::clone(&db));
    let note_repo = NoteRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));
    let feedback_repo = FeedbackRepository::new(Arc::clone(&db));

    let storage_dir = std::env::temp_dir().join(format!("notehub-api-{}", uuid::Uuid::new_v4()));
    let storage = Arc::new(LocalStorage::new(storage_dir, "/media".to_string()));

    let note_service = NoteService::new(
        note_repo.clone(),
        subject_repo.clone(),
        semester_repo.clone(),
        comment_repo.clone(),
        rating_repo.clone(),
        storage.clone(),
    );
    let subject_service = SubjectService::new(
        subject_repo.clone(),
        semester_repo.clone(),
        note_repo.clone(),
        rating_repo.clone(),
        note_service.clone(),
    );
    let semester_service = SemesterService::new(
        semester_repo.clone(),
        subject_repo.clone(),
        note_repo.clone(),
        subject_service.clone(),
    );
    let comment_service = CommentService::new(comment_repo.clone(), note_repo.clone());
    let rating_service = RatingService::new(rating_repo.clone(), note_repo.clone());
    let feedback_service = FeedbackService::new(feedback_repo);
    let stats_service = StatsService::new(
        semester_repo,
        subject_repo,
        note_repo.clone(),
        comment_repo,
        rating_repo,
    );
    let media_service = MediaService::new(note_repo, storage);

    AppState {
        semester_service,
        subject_service,
        note_service,
        comment_service,
        rating_service,
        feedback_service,
        stats_service,
        media_service,
    }
}

fn test_app(db: sea_orm::DatabaseConnection) -> Router {
    Router::new()
        .nest("/api", api_router())
        .with_state(create_test_state(Arc::new(db)))
}

fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
    maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
}

fn test_semester(id: &str, number: i32) -> semester::Model {
    semester::Model {
        id: id.to_string(),
        number,
        name: format!("Semester {number}"),
        description: String::new(),
        is_active: true,
        created_at: chrono::Utc::now().into(),
    }
}

fn test_subject(id: &str, code: &str) -> subject::Model {
    subject::Model {
        id: id.to_string(),
        semester_id: "s1".to_string(),
        name: format!("Subject {code}"),
        code: code.to_string(),
        description: String::new(),
        credits: 3,
        thumbnail: None,
        is_active: true,
        created_at: chrono::Utc::now().into(),
    }
}

fn test_note(id: &str, downloads: i64, is_featured: bool) -> note::Model {
    note::Model {
        id: id.to_string(),
        subject_id: "sub1".to_string(),
        title: "Lecture 01".to_string(),
        description: "Notes for Lecture 01".to_string(),
        content: String::new(),
        file_path: None,
        file_name: None,
        thumbnail: None,
        tags: String::new(),
        chapter: String::new(),
        note_type: NoteType::Lecture,
        downloads,
        is_featured,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_stats_returns_six_counters() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[count_row(4)]])
        .append_query_results([[count_row(10)]])
        .append_query_results([[count_row(25)]])
        .append_query_results([[maplit::btreemap! {
            "total" => sea_orm::Value::BigInt(Some(180))
        }]])
        .append_query_results([[count_row(7)]])
        .append_query_results([[count_row(13)]])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_semesters"], 4);
    assert_eq!(json["total_subjects"], 10);
    assert_eq!(json["total_notes"], 25);
    assert_eq!(json["total_downloads"], 180);
    assert_eq!(json["total_comments"], 7);
    assert_eq!(json["total_ratings"], 13);
}

#[tokio::test]
async fn test_unknown_note_detail_is_404() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([Vec::<note::Model>::new()])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notes/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOTE_NOT_FOUND");
}

#[tokio::test]
async fn test_featured_notes_lists_flagged_notes() {
    let n1 = test_note("n1", 3, true);
    let n2 = test_note("n2", 0, true);

    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[n1, n2]])
        .append_query_results([[test_subject("sub1", "CS101")]])
        .append_query_results([Vec::<rating::Model>::new()])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/featured-notes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["subject_code"], "CS101");
    assert_eq!(results[0]["average_rating"], 0.0);
}

#[tokio::test]
async fn test_increment_download_adds_one() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[test_note("n1", 5, false)]])
        .append_query_results([[test_note("n1", 6, false)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notes/n1/increment-download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["downloads"], 6);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_semester_list_is_paginated_with_counts() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .append_query_results([[test_semester("s1", 1)]])
        .append_query_results([[count_row(2)]])
        .append_query_results([[count_row(5)]])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/semesters")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["next"], serde_json::Value::Null);
    assert_eq!(json["previous"], serde_json::Value::Null);
    assert_eq!(json["results"][0]["number"], 1);
    assert_eq!(json["results"][0]["total_subjects"], 2);
    assert_eq!(json["results"][0]["total_notes"], 5);
}

#[tokio::test]
async fn test_rating_with_out_of_range_score_is_400() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();

    let app = test_app(db);

    let body = serde_json::json!({
        "author_name": "Reader",
        "author_email": "reader@example.com",
        "score": 6
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notes/n1/ratings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_feedback_create_returns_201() {
    let inserted = feedback::Model {
        id: "f1".to_string(),
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        feedback_type: FeedbackType::Suggestion,
        subject: "Dark mode".to_string(),
        message: "Please add one".to_string(),
        created_at: chrono::Utc::now().into(),
    };

    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[inserted]])
        .into_connection();

    let app = test_app(db);

    let body = serde_json::json!({
        "name": "Visitor",
        "email": "visitor@example.com",
        "feedback_type": "suggestion",
        "subject": "Dark mode",
        "message": "Please add one"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/feedback")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["feedback_type"], "suggestion");
    assert_eq!(json["subject"], "Dark mode");
}

#[tokio::test]
async fn test_download_without_file_is_404() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([[test_note("n1", 0, false)]])
        .into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notes/n1/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
}

#[tokio::test]
async fn test_filtered_note_list_with_unknown_type_is_empty() {
    // An unrecognized type value can match no stored note type, so no
    // query should even be issued.
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();

    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notes?type=podcast")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}
