//! Feedback endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use notehub_common::AppResult;
use notehub_core::CreateFeedbackInput;
use notehub_db::entities::feedback;
use serde::Serialize;

use crate::middleware::AppState;

/// Feedback entry.
#[derive(Serialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub feedback_type: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(f: feedback::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            email: f.email,
            feedback_type: f.feedback_type.as_str().to_string(),
            subject: f.subject,
            message: f.message,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Submit feedback.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFeedbackInput>,
) -> AppResult<(StatusCode, Json<FeedbackResponse>)> {
    let feedback = state.feedback_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(feedback.into())))
}

/// Create the feedback router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create))
}
