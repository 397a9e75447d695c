//! Feedback repository.

use std::sync::Arc;

use crate::entities::{Feedback, feedback};
use notehub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
};

/// Feedback repository for database operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    db: Arc<DatabaseConnection>,
}

impl FeedbackRepository {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a feedback entry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<feedback::Model>> {
        Feedback::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new feedback entry.
    pub async fn create(&self, model: feedback::ActiveModel) -> AppResult<feedback::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a feedback entry.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Feedback::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List feedback entries, newest first, one page at a time.
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<feedback::Model>, u64)> {
        let paginator = Feedback::find()
            .order_by_desc(feedback::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        let count = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, count))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::feedback::FeedbackType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_feedback(id: &str, feedback_type: FeedbackType) -> feedback::Model {
        feedback::Model {
            id: id.to_string(),
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            feedback_type,
            subject: "Search is great".to_string(),
            message: "Keep it up".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_returns_page_and_count() {
        let f1 = create_test_feedback("f1", FeedbackType::Suggestion);
        let f2 = create_test_feedback("f2", FeedbackType::General);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FeedbackRepository::new(db);
        let (items, count) = repo.list(1, 20).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(items.len(), 2);
    }
}
