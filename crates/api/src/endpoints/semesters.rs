//! Semester endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use notehub_common::AppResult;
use notehub_core::{SemesterDetail, SemesterWithStats};
use serde::Serialize;

use crate::{
    endpoints::subjects::SubjectResponse,
    middleware::AppState,
    response::{PAGE_SIZE, PageQuery, Paginated},
};

/// Semester list entry.
#[derive(Serialize)]
pub struct SemesterResponse {
    pub id: String,
    pub number: i32,
    pub name: String,
    pub description: String,
    pub total_subjects: u64,
    pub total_notes: u64,
}

impl From<SemesterWithStats> for SemesterResponse {
    fn from(s: SemesterWithStats) -> Self {
        Self {
            id: s.semester.id,
            number: s.semester.number,
            name: s.semester.name,
            description: s.semester.description,
            total_subjects: s.total_subjects,
            total_notes: s.total_notes,
        }
    }
}

/// Semester detail with nested subjects.
#[derive(Serialize)]
pub struct SemesterDetailResponse {
    pub id: String,
    pub number: i32,
    pub name: String,
    pub description: String,
    pub total_subjects: u64,
    pub total_notes: u64,
    pub subjects: Vec<SubjectResponse>,
}

impl From<SemesterDetail> for SemesterDetailResponse {
    fn from(d: SemesterDetail) -> Self {
        Self {
            id: d.semester.id,
            number: d.semester.number,
            name: d.semester.name,
            description: d.semester.description,
            total_subjects: d.total_subjects,
            total_notes: d.total_notes,
            subjects: d.subjects.into_iter().map(Into::into).collect(),
        }
    }
}

/// List active semesters.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<SemesterResponse>>> {
    let page = query.page();
    let (items, count) = state.semester_service.list(page, PAGE_SIZE).await?;

    Ok(Json(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        count,
        page,
        PAGE_SIZE,
    )))
}

/// Semester detail, looked up by semester number.
async fn detail(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> AppResult<Json<SemesterDetailResponse>> {
    let detail = state.semester_service.get_by_number(number).await?;
    Ok(Json(detail.into()))
}

/// Active subjects of one semester, looked up by semester number.
async fn subjects(
    State(state): State<AppState>,
    Path(number): Path<i32>,
) -> AppResult<Json<Vec<SubjectResponse>>> {
    let subjects = state
        .subject_service
        .list_for_semester_number(number)
        .await?;

    Ok(Json(subjects.into_iter().map(Into::into).collect()))
}

/// Create the semester router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{number}", get(detail))
        .route("/{number}/subjects", get(subjects))
}
