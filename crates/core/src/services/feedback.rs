//! Feedback service.

use notehub_common::{AppError, AppResult, IdGenerator};
use notehub_db::{
    entities::feedback::{self, FeedbackType},
    repositories::FeedbackRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for submitting feedback.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default = "default_feedback_type")]
    pub feedback_type: FeedbackType,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1))]
    pub message: String,
}

const fn default_feedback_type() -> FeedbackType {
    FeedbackType::General
}

/// Feedback service for business logic.
#[derive(Clone)]
pub struct FeedbackService {
    feedback_repo: FeedbackRepository,
    id_gen: IdGenerator,
}

impl FeedbackService {
    /// Create a new feedback service.
    #[must_use]
    pub fn new(feedback_repo: FeedbackRepository) -> Self {
        Self {
            feedback_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit feedback. No parent relation, no authentication.
    pub async fn create(&self, input: CreateFeedbackInput) -> AppResult<feedback::Model> {
        input.validate()?;

        let model = feedback::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            feedback_type: Set(input.feedback_type),
            subject: Set(input.subject),
            message: Set(input.message),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.feedback_repo.create(model).await
    }

    /// List feedback entries, newest first (admin view).
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<feedback::Model>, u64)> {
        self.feedback_repo.list(page, per_page).await
    }

    /// Delete a feedback entry (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.feedback_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("feedback {id}")))?;

        self.feedback_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = FeedbackService::new(FeedbackRepository::new(db));

        let input = CreateFeedbackInput {
            name: "Visitor".to_string(),
            email: "nope".to_string(),
            feedback_type: FeedbackType::Bug,
            subject: "Broken link".to_string(),
            message: "The download link 404s".to_string(),
        };

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_inserts_feedback() {
        let inserted = feedback::Model {
            id: "f1".to_string(),
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            feedback_type: FeedbackType::Suggestion,
            subject: "Dark mode".to_string(),
            message: "Please add one".to_string(),
            created_at: chrono::Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inserted]])
                .into_connection(),
        );
        let service = FeedbackService::new(FeedbackRepository::new(db));

        let input = CreateFeedbackInput {
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            feedback_type: FeedbackType::Suggestion,
            subject: "Dark mode".to_string(),
            message: "Please add one".to_string(),
        };

        let feedback = service.create(input).await.unwrap();
        assert_eq!(feedback.subject, "Dark mode");
    }
}
