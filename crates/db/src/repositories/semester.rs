//! Semester repository.

use std::sync::Arc;

use crate::entities::{Semester, semester};
use notehub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Semester repository for database operations.
#[derive(Clone)]
pub struct SemesterRepository {
    db: Arc<DatabaseConnection>,
}

impl SemesterRepository {
    /// Create a new semester repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a semester by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<semester::Model>> {
        Semester::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a semester by its number.
    pub async fn find_by_number(&self, number: i32) -> AppResult<Option<semester::Model>> {
        Semester::find()
            .filter(semester::Column::Number.eq(number))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a semester number is already taken.
    ///
    /// `exclude_id` skips the row being updated so an edit does not
    /// collide with itself.
    pub async fn number_exists(&self, number: i32, exclude_id: Option<&str>) -> AppResult<bool> {
        let mut query = Semester::find().filter(semester::Column::Number.eq(number));

        if let Some(id) = exclude_id {
            query = query.filter(semester::Column::Id.ne(id));
        }

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Create a new semester.
    pub async fn create(&self, model: semester::ActiveModel) -> AppResult<semester::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a semester.
    pub async fn update(&self, model: semester::ActiveModel) -> AppResult<semester::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a semester. Subjects and notes below it go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Semester::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List active semesters ordered by number, one page at a time.
    ///
    /// Returns the page of rows and the total row count.
    pub async fn list_active(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<semester::Model>, u64)> {
        let paginator = Semester::find()
            .filter(semester::Column::IsActive.eq(true))
            .order_by_asc(semester::Column::Number)
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

    /// List every semester, active or not, ordered by number.
    pub async fn list_all(&self) -> AppResult<Vec<semester::Model>> {
        Semester::find()
            .order_by_asc(semester::Column::Number)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active semesters.
    pub async fn count_active(&self) -> AppResult<u64> {
        Semester::find()
            .filter(semester::Column::IsActive.eq(true))
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

    fn create_test_semester(id: &str, number: i32, name: &str) -> semester::Model {
        semester::Model {
            id: id.to_string(),
            number,
            name: name.to_string(),
            description: String::new(),
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_number_found() {
        let semester = create_test_semester("s1", 3, "Third Semester");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[semester.clone()]])
                .into_connection(),
        );

        let repo = SemesterRepository::new(db);
        let result = repo.find_by_number(3).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().number, 3);
    }

    #[tokio::test]
    async fn test_find_by_number_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<semester::Model>::new()])
                .into_connection(),
        );

        let repo = SemesterRepository::new(db);
        let result = repo.find_by_number(9).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_number_exists_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = SemesterRepository::new(db);
        assert!(repo.number_exists(1, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_number_exists_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = SemesterRepository::new(db);
        assert!(!repo.number_exists(8, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_active_returns_page_and_count() {
        let s1 = create_test_semester("s1", 1, "First Semester");
        let s2 = create_test_semester("s2", 2, "Second Semester");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[s1, s2]])
                .into_connection(),
        );

        let repo = SemesterRepository::new(db);
        let (items, count) = repo.list_active(1, 20).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].number, 1);
    }
}
