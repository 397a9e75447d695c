//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use notehub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a rating by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<rating::Model>> {
        Rating::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a rating by note and author email.
    pub async fn find_by_note_and_email(
        &self,
        note_id: &str,
        author_email: &str,
    ) -> AppResult<Option<rating::Model>> {
        Rating::find()
            .filter(rating::Column::NoteId.eq(note_id))
            .filter(rating::Column::AuthorEmail.eq(author_email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if an email has already rated a note.
    pub async fn has_rated(&self, note_id: &str, author_email: &str) -> AppResult<bool> {
        Ok(self
            .find_by_note_and_email(note_id, author_email)
            .await?
            .is_some())
    }

    /// Create a new rating.
    pub async fn create(&self, model: rating::ActiveModel) -> AppResult<rating::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a rating.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Rating::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List ratings on a note, newest first.
    pub async fn list_by_note(&self, note_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::NoteId.eq(note_id))
            .order_by_desc(rating::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List ratings across a set of notes.
    ///
    /// Used when aggregating per-subject averages in one round trip.
    pub async fn list_by_note_ids(&self, note_ids: &[String]) -> AppResult<Vec<rating::Model>> {
        if note_ids.is_empty() {
            return Ok(vec![]);
        }

        Rating::find()
            .filter(rating::Column::NoteId.is_in(note_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all ratings, newest first, one page at a time.
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<rating::Model>, u64)> {
        let paginator = Rating::find()
            .order_by_desc(rating::Column::CreatedAt)
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

    /// Count all ratings.
    pub async fn count_all(&self) -> AppResult<u64> {
        Rating::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_rating(id: &str, note_id: &str, email: &str, score: i32) -> rating::Model {
        rating::Model {
            id: id.to_string(),
            note_id: note_id.to_string(),
            author_name: "Reader".to_string(),
            author_email: email.to_string(),
            score,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_rated_true() {
        let rating = create_test_rating("r1", "n1", "alice@example.com", 4);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rating]])
                .into_connection(),
        );

        let repo = RatingRepository::new(db);
        assert!(repo.has_rated("n1", "alice@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_rated_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<rating::Model>::new()])
                .into_connection(),
        );

        let repo = RatingRepository::new(db);
        assert!(!repo.has_rated("n1", "bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_note_ids_empty_skips_query() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = RatingRepository::new(db);
        let result = repo.list_by_note_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_note() {
        let r1 = create_test_rating("r1", "n1", "alice@example.com", 3);
        let r2 = create_test_rating("r2", "n1", "bob@example.com", 5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = RatingRepository::new(db);
        let result = repo.list_by_note("n1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
