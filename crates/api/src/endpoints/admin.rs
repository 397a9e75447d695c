//! Admin endpoints: back-office CRUD and bulk upload.
//!
//! These routes mirror the admin console's data contract: every entity is
//! reachable including inactive rows, and creating notes supports fanning
//! one multipart upload out into many records. Editing an existing note is
//! a plain single-record update with no file field.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use notehub_common::{AppError, AppResult};
use notehub_core::{
    BulkUploadInput, CreateNoteInput, CreateSemesterInput, CreateSubjectInput, UpdateNoteInput,
    UpdateSemesterInput, UpdateSubjectInput, UploadFile,
};
use notehub_db::entities::{note, note::NoteType, semester, subject};
use serde::Serialize;

use crate::{
    endpoints::feedback::FeedbackResponse,
    endpoints::notes::{CommentResponse, NoteDetailResponse, RatingResponse, parse_note_type},
    endpoints::semesters::SemesterResponse,
    endpoints::subjects::SubjectResponse,
    middleware::AppState,
    response::{PAGE_SIZE, PageQuery, Paginated},
};

/// Semester row as stored, without derived counts.
#[derive(Serialize)]
pub struct SemesterAdminResponse {
    pub id: String,
    pub number: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<semester::Model> for SemesterAdminResponse {
    fn from(s: semester::Model) -> Self {
        Self {
            id: s.id,
            number: s.number,
            name: s.name,
            description: s.description,
            is_active: s.is_active,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Subject row as stored, without derived counts.
#[derive(Serialize)]
pub struct SubjectAdminResponse {
    pub id: String,
    pub semester_id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: i32,
    pub thumbnail: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<subject::Model> for SubjectAdminResponse {
    fn from(s: subject::Model) -> Self {
        Self {
            id: s.id,
            semester_id: s.semester_id,
            name: s.name,
            code: s.code,
            description: s.description,
            credits: s.credits,
            thumbnail: s.thumbnail,
            is_active: s.is_active,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Note row as stored, without derived fields.
#[derive(Serialize)]
pub struct NoteAdminResponse {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub file: Option<String>,
    pub file_name: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: String,
    pub chapter: String,
    pub note_type: String,
    pub downloads: i64,
    pub is_featured: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<note::Model> for NoteAdminResponse {
    fn from(n: note::Model) -> Self {
        Self {
            id: n.id,
            subject_id: n.subject_id,
            title: n.title,
            description: n.description,
            content: n.content,
            file: n.file_path,
            file_name: n.file_name,
            thumbnail: n.thumbnail,
            tags: n.tags,
            chapter: n.chapter,
            note_type: n.note_type.as_str().to_string(),
            downloads: n.downloads,
            is_featured: n.is_featured,
            created_at: n.created_at.to_rfc3339(),
            updated_at: n.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Bulk upload outcome.
#[derive(Serialize)]
pub struct BulkUploadResponse {
    pub created: usize,
    pub notes: Vec<NoteAdminResponse>,
}

// ==================== Semesters ====================

/// Every semester, active or not, with derived counts.
async fn list_semesters(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SemesterResponse>>> {
    let items = state.semester_service.list_all().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

async fn get_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SemesterResponse>> {
    let item = state.semester_service.get_admin(&id).await?;
    Ok(Json(item.into()))
}

async fn create_semester(
    State(state): State<AppState>,
    Json(input): Json<CreateSemesterInput>,
) -> AppResult<(StatusCode, Json<SemesterAdminResponse>)> {
    let semester = state.semester_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(semester.into())))
}

async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSemesterInput>,
) -> AppResult<Json<SemesterAdminResponse>> {
    let semester = state.semester_service.update(&id, input).await?;
    Ok(Json(semester.into()))
}

async fn delete_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.semester_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Subjects ====================

/// Every subject, active or not, with derived fields.
async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<SubjectResponse>>> {
    let items = state.subject_service.list_all().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubjectResponse>> {
    let item = state.subject_service.get_admin(&id).await?;
    Ok(Json(item.into()))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(input): Json<CreateSubjectInput>,
) -> AppResult<(StatusCode, Json<SubjectAdminResponse>)> {
    let subject = state.subject_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSubjectInput>,
) -> AppResult<Json<SubjectAdminResponse>> {
    let subject = state.subject_service.update(&id, input).await?;
    Ok(Json(subject.into()))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.subject_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Notes ====================

/// All notes, newest first.
async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<NoteAdminResponse>>> {
    let page = query.page();
    let (items, count) = state
        .note_service
        .list(notehub_db::repositories::NoteFilter::default(), page, PAGE_SIZE)
        .await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(|s| s.note.into()).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteDetailResponse>> {
    let detail = state.note_service.get(&id).await?;
    Ok(Json(detail.into()))
}

/// Create a single note without a file.
async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> AppResult<(StatusCode, Json<NoteAdminResponse>)> {
    let note = state.note_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// Update a note. Single record, no file field.
async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateNoteInput>,
) -> AppResult<Json<NoteAdminResponse>> {
    let note = state.note_service.update(&id, input).await?;
    Ok(Json(note.into()))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.note_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn feature_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteAdminResponse>> {
    let note = state.note_service.set_featured(&id, true).await?;
    Ok(Json(note.into()))
}

async fn unfeature_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteAdminResponse>> {
    let note = state.note_service.set_featured(&id, false).await?;
    Ok(Json(note.into()))
}

/// Create one note per uploaded file.
///
/// Multipart fields: `subject_id` (required), `note_type`, `chapter`,
/// `tags`, and any number of `files` parts. Titles are derived from the
/// filenames; each file is persisted and inserted independently.
async fn bulk_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<BulkUploadResponse>)> {
    let mut subject_id: Option<String> = None;
    let mut note_type = NoteType::Lecture;
    let mut chapter = String::new();
    let mut tags = String::new();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" | "file" => {
                let file_name = field
                    .file_name()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                files.push(UploadFile {
                    name: file_name,
                    data,
                });
            }
            "subject_id" => {
                subject_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "note_type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.is_empty() {
                    note_type = parse_note_type(&text).ok_or_else(|| {
                        AppError::Validation(format!("unknown note type {text}"))
                    })?;
                }
            }
            "chapter" => {
                chapter = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            "tags" => {
                tags = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            _ => {}
        }
    }

    let subject_id =
        subject_id.ok_or_else(|| AppError::BadRequest("subject_id is required".to_string()))?;

    let input = BulkUploadInput {
        subject_id,
        note_type,
        chapter,
        tags,
    };

    let notes = state.note_service.bulk_create(input, files).await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkUploadResponse {
            created: notes.len(),
            notes: notes.into_iter().map(Into::into).collect(),
        }),
    ))
}

// ==================== Comments / Ratings / Feedback ====================

async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<CommentResponse>>> {
    let page = query.page();
    let (items, count) = state.comment_service.list(page, PAGE_SIZE).await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.comment_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<RatingResponse>>> {
    let page = query.page();
    let (items, count) = state.rating_service.list(page, PAGE_SIZE).await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

async fn delete_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.rating_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<FeedbackResponse>>> {
    let page = query.page();
    let (items, count) = state.feedback_service.list(page, PAGE_SIZE).await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.feedback_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/semesters", get(list_semesters).post(create_semester))
        .route(
            "/semesters/{id}",
            get(get_semester).put(update_semester).delete(delete_semester),
        )
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/bulk", post(bulk_upload))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/notes/{id}/feature", post(feature_note))
        .route("/notes/{id}/unfeature", post(unfeature_note))
        .route("/comments", get(list_comments))
        .route("/comments/{id}", delete(delete_comment))
        .route("/ratings", get(list_ratings))
        .route("/ratings/{id}", delete(delete_rating))
        .route("/feedback", get(list_feedback))
        .route("/feedback/{id}", delete(delete_feedback))
}
