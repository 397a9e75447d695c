//! API endpoints.

mod admin;
mod feedback;
mod files;
mod notes;
mod semesters;
mod stats;
mod subjects;

use axum::{Router, routing::get};

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/semesters", semesters::router())
        .nest("/subjects", subjects::router())
        .nest("/notes", notes::router().merge(files::router()))
        .nest("/feedback", feedback::router())
        .nest("/stats", stats::router())
        .route("/featured-notes", get(notes::featured))
        .nest("/admin", admin::router())
}
