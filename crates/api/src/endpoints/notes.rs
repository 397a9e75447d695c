//! Note endpoints: listings, detail, nested comments and ratings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use notehub_common::AppResult;
use notehub_core::{CreateCommentInput, CreateRatingInput, NoteDetail, NoteSummary};
use notehub_db::entities::{comment, note::NoteType, rating};
use notehub_db::repositories::NoteFilter;
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{PAGE_SIZE, PageQuery, Paginated},
};

/// Note list entry.
#[derive(Serialize)]
pub struct NoteListResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub tags: String,
    pub chapter: String,
    pub note_type: String,
    pub created_at: String,
    pub downloads: i64,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub subject_name: String,
    pub subject_code: String,
    pub is_featured: bool,
}

impl From<NoteSummary> for NoteListResponse {
    fn from(s: NoteSummary) -> Self {
        Self {
            id: s.note.id,
            title: s.note.title,
            description: s.note.description,
            thumbnail: s.note.thumbnail,
            tags: s.note.tags,
            chapter: s.note.chapter,
            note_type: s.note.note_type.as_str().to_string(),
            created_at: s.note.created_at.to_rfc3339(),
            downloads: s.note.downloads,
            average_rating: s.average_rating,
            total_ratings: s.total_ratings,
            subject_name: s.subject_name,
            subject_code: s.subject_code,
            is_featured: s.note.is_featured,
        }
    }
}

/// Comment entry.
#[derive(Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            author_name: c.author_name,
            author_email: c.author_email,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Rating entry.
#[derive(Serialize)]
pub struct RatingResponse {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub score: i32,
    pub created_at: String,
}

impl From<rating::Model> for RatingResponse {
    fn from(r: rating::Model) -> Self {
        Self {
            id: r.id,
            author_name: r.author_name,
            author_email: r.author_email,
            score: r.score,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Full note detail.
#[derive(Serialize)]
pub struct NoteDetailResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub file: Option<String>,
    pub file_name: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: String,
    pub chapter: String,
    pub note_type: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub downloads: i64,
    pub is_featured: bool,
    pub comments: Vec<CommentResponse>,
    pub ratings: Vec<RatingResponse>,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub subject_name: String,
    pub subject_code: String,
    pub semester_number: i32,
}

impl From<NoteDetail> for NoteDetailResponse {
    fn from(d: NoteDetail) -> Self {
        Self {
            id: d.note.id,
            title: d.note.title,
            description: d.note.description,
            content: d.note.content,
            file: d.note.file_path,
            file_name: d.note.file_name,
            thumbnail: d.note.thumbnail,
            tags: d.note.tags,
            chapter: d.note.chapter,
            note_type: d.note.note_type.as_str().to_string(),
            created_at: d.note.created_at.to_rfc3339(),
            updated_at: d.note.updated_at.map(|dt| dt.to_rfc3339()),
            downloads: d.note.downloads,
            is_featured: d.note.is_featured,
            comments: d.comments.into_iter().map(Into::into).collect(),
            ratings: d.ratings.into_iter().map(Into::into).collect(),
            average_rating: d.average_rating,
            total_ratings: d.total_ratings,
            subject_name: d.subject_name,
            subject_code: d.subject_code,
            semester_number: d.semester_number,
        }
    }
}

/// Note list filters. All filters compose conjunctively.
#[derive(Debug, Deserialize)]
pub struct NoteListQuery {
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// Exact note type match.
    #[serde(rename = "type", alias = "note_type")]
    pub note_type: Option<String>,
    /// Case-insensitive substring match on the chapter.
    pub chapter: Option<String>,
    /// Any non-empty value restricts to featured notes.
    pub featured: Option<String>,
    pub page: Option<u64>,
}

pub(super) fn parse_note_type(value: &str) -> Option<NoteType> {
    match value {
        "lecture" => Some(NoteType::Lecture),
        "assignment" => Some(NoteType::Assignment),
        "tutorial" => Some(NoteType::Tutorial),
        "exam" => Some(NoteType::Exam),
        "reference" => Some(NoteType::Reference),
        _ => None,
    }
}

/// Translate query parameters into a repository filter.
///
/// An unrecognized type value matches nothing, mirroring an exact-match
/// filter against the stored enum values.
fn build_filter(query: &NoteListQuery, subject_id: Option<String>) -> Option<NoteFilter> {
    let mut filter = NoteFilter {
        subject_id,
        ..NoteFilter::default()
    };

    if let Some(search) = &query.search
        && !search.is_empty()
    {
        filter.search = Some(search.clone());
    }

    if let Some(value) = &query.note_type
        && !value.is_empty()
    {
        match parse_note_type(value) {
            Some(note_type) => filter.note_type = Some(note_type),
            None => return None,
        }
    }

    if let Some(chapter) = &query.chapter
        && !chapter.is_empty()
    {
        filter.chapter = Some(chapter.clone());
    }

    if query.featured.as_deref().is_some_and(|f| !f.is_empty()) {
        filter.featured_only = true;
    }

    Some(filter)
}

async fn list_filtered(
    state: &AppState,
    query: &NoteListQuery,
    subject_id: Option<String>,
) -> AppResult<Paginated<NoteListResponse>> {
    let page = PageQuery { page: query.page }.page();

    let Some(filter) = build_filter(query, subject_id) else {
        return Ok(Paginated::empty());
    };

    let (items, count) = state.note_service.list(filter, page, PAGE_SIZE).await?;

    Ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    ))
}

/// List all notes, filterable.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<NoteListQuery>,
) -> AppResult<Json<Paginated<NoteListResponse>>> {
    Ok(Json(list_filtered(&state, &query, None).await?))
}

/// List one subject's notes, filterable.
pub(super) async fn list_for_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Query(query): Query<NoteListQuery>,
) -> AppResult<Json<Paginated<NoteListResponse>>> {
    Ok(Json(list_filtered(&state, &query, Some(subject_id)).await?))
}

/// Note detail with nested comments and ratings.
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteDetailResponse>> {
    let detail = state.note_service.get(&id).await?;
    Ok(Json(detail.into()))
}

/// Up to six featured notes.
pub(super) async fn featured(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<NoteListResponse>>> {
    let notes = state.note_service.featured(6).await?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

/// Create a comment under a note. The note id comes from the URL.
async fn create_comment(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state.comment_service.create(&note_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Create a rating under a note. The note id comes from the URL.
async fn create_rating(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(input): Json<CreateRatingInput>,
) -> AppResult<(StatusCode, Json<RatingResponse>)> {
    let rating = state.rating_service.create(&note_id, input).await?;
    Ok((StatusCode::CREATED, Json(rating.into())))
}

/// Create the note router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(detail))
        .route("/{id}/comments", post(create_comment))
        .route("/{id}/ratings", post(create_rating))
}
