//! Subject repository.

use std::sync::Arc;

use crate::entities::{Subject, subject};
use notehub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Subject repository for database operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subject by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<subject::Model>> {
        Subject::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a course code is already taken.
    pub async fn code_exists(&self, code: &str, exclude_id: Option<&str>) -> AppResult<bool> {
        let mut query = Subject::find().filter(subject::Column::Code.eq(code));

        if let Some(id) = exclude_id {
            query = query.filter(subject::Column::Id.ne(id));
        }

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Create a new subject.
    pub async fn create(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a subject.
    pub async fn update(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a subject. Notes below it go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Subject::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List active subjects ordered by code, one page at a time.
    pub async fn list_active(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<subject::Model>, u64)> {
        let paginator = Subject::find()
            .filter(subject::Column::IsActive.eq(true))
            .order_by_asc(subject::Column::Code)
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

    /// List active subjects of one semester, ordered by code.
    pub async fn list_active_by_semester(
        &self,
        semester_id: &str,
    ) -> AppResult<Vec<subject::Model>> {
        Subject::find()
            .filter(subject::Column::SemesterId.eq(semester_id))
            .filter(subject::Column::IsActive.eq(true))
            .order_by_asc(subject::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all subjects of one semester, active or not, ordered by code.
    pub async fn list_by_semester(&self, semester_id: &str) -> AppResult<Vec<subject::Model>> {
        Subject::find()
            .filter(subject::Column::SemesterId.eq(semester_id))
            .order_by_asc(subject::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find subjects by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<subject::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Subject::find()
            .filter(subject::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all subjects of one semester.
    pub async fn count_by_semester(&self, semester_id: &str) -> AppResult<u64> {
        Subject::find()
            .filter(subject::Column::SemesterId.eq(semester_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every subject, active or not, ordered by code.
    pub async fn list_all(&self) -> AppResult<Vec<subject::Model>> {
        Subject::find()
            .order_by_asc(subject::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active subjects.
    pub async fn count_active(&self) -> AppResult<u64> {
        Subject::find()
            .filter(subject::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
