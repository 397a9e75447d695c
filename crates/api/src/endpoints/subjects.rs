//! Subject endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use notehub_common::AppResult;
use notehub_core::{SubjectDetail, SubjectSummary};
use serde::Serialize;

use crate::{
    endpoints::notes::NoteListResponse,
    middleware::AppState,
    response::{PAGE_SIZE, PageQuery, Paginated},
};

/// Subject list entry.
#[derive(Serialize)]
pub struct SubjectResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: i32,
    pub thumbnail: Option<String>,
    pub total_notes: u64,
    pub total_downloads: i64,
    pub average_rating: f64,
    pub semester_number: i32,
}

impl From<SubjectSummary> for SubjectResponse {
    fn from(s: SubjectSummary) -> Self {
        Self {
            id: s.subject.id,
            name: s.subject.name,
            code: s.subject.code,
            description: s.subject.description,
            credits: s.subject.credits,
            thumbnail: s.subject.thumbnail,
            total_notes: s.total_notes,
            total_downloads: s.total_downloads,
            average_rating: s.average_rating,
            semester_number: s.semester_number,
        }
    }
}

/// Subject detail with nested notes.
#[derive(Serialize)]
pub struct SubjectDetailResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: i32,
    pub thumbnail: Option<String>,
    pub total_notes: u64,
    pub total_downloads: i64,
    pub average_rating: f64,
    pub semester_number: i32,
    pub semester_name: String,
    pub notes: Vec<NoteListResponse>,
}

impl From<SubjectDetail> for SubjectDetailResponse {
    fn from(d: SubjectDetail) -> Self {
        Self {
            id: d.subject.id,
            name: d.subject.name,
            code: d.subject.code,
            description: d.subject.description,
            credits: d.subject.credits,
            thumbnail: d.subject.thumbnail,
            total_notes: d.total_notes,
            total_downloads: d.total_downloads,
            average_rating: d.average_rating,
            semester_number: d.semester_number,
            semester_name: d.semester_name,
            notes: d.notes.into_iter().map(Into::into).collect(),
        }
    }
}

/// List active subjects.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<SubjectResponse>>> {
    let page = query.page();
    let (items, count) = state.subject_service.list(page, PAGE_SIZE).await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

/// Subject detail with nested notes.
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubjectDetailResponse>> {
    let detail = state.subject_service.get(&id).await?;
    Ok(Json(detail.into()))
}

/// Create the subject router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(detail))
        .route("/{id}/notes", get(super::notes::list_for_subject))
}
