//! Note repository.

use std::sync::Arc;

use crate::entities::{Note, note, subject};
use notehub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};

/// Composable filters for note listings. All present filters apply together.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Restrict to one subject.
    pub subject_id: Option<String>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// Exact note type match.
    pub note_type: Option<note::NoteType>,
    /// Case-insensitive substring match on the chapter.
    pub chapter: Option<String>,
    /// Restrict to featured notes.
    pub featured_only: bool,
}

impl NoteFilter {
    fn into_condition(self) -> Condition {
        let mut condition = Condition::all();

        if let Some(subject_id) = self.subject_id {
            condition = condition.add(note::Column::SubjectId.eq(subject_id));
        }

        if let Some(search) = self.search {
            let pattern = escape_like_pattern(&search);
            condition = condition.add(Expr::col(note::Column::Title).ilike(pattern));
        }

        if let Some(note_type) = self.note_type {
            condition = condition.add(note::Column::NoteType.eq(note_type));
        }

        if let Some(chapter) = self.chapter {
            let pattern = escape_like_pattern(&chapter);
            condition = condition.add(Expr::col(note::Column::Chapter).ilike(pattern));
        }

        if self.featured_only {
            condition = condition.add(note::Column::IsFeatured.eq(true));
        }

        condition
    }
}

fn escape_like_pattern(value: &str) -> String {
    format!("%{}%", value.replace('%', "\\%").replace('_', "\\_"))
}

/// Row shape for the downloads sum aggregate.
#[derive(Debug, FromQueryResult)]
struct DownloadTotal {
    total: i64,
}

/// Note repository for database operations.
#[derive(Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteRepository {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a note by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note::Model>> {
        Note::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a note by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<note::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(id.to_string()))
    }

    /// Create a new note.
    pub async fn create(&self, model: note::ActiveModel) -> AppResult<note::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a note.
    pub async fn update(&self, model: note::ActiveModel) -> AppResult<note::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a note. Comments and ratings below it go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Note::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List notes matching the filter, newest first, one page at a time.
    pub async fn list(
        &self,
        filter: NoteFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<note::Model>, u64)> {
        let paginator = Note::find()
            .filter(filter.into_condition())
            .order_by_desc(note::Column::CreatedAt)
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

    /// List all notes of one subject, newest first.
    pub async fn list_by_subject(&self, subject_id: &str) -> AppResult<Vec<note::Model>> {
        Note::find()
            .filter(note::Column::SubjectId.eq(subject_id))
            .order_by_desc(note::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List featured notes, newest first, up to `limit`.
    pub async fn list_featured(&self, limit: u64) -> AppResult<Vec<note::Model>> {
        Note::find()
            .filter(note::Column::IsFeatured.eq(true))
            .order_by_desc(note::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the download counter atomically (single UPDATE query, no fetch).
    pub async fn increment_downloads(&self, id: &str) -> AppResult<()> {
        Note::update_many()
            .col_expr(
                note::Column::Downloads,
                Expr::col(note::Column::Downloads).add(1),
            )
            .filter(note::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all notes.
    pub async fn count_all(&self) -> AppResult<u64> {
        Note::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count notes under one semester, across all its subjects.
    pub async fn count_by_semester(&self, semester_id: &str) -> AppResult<u64> {
        Note::find()
            .join(JoinType::InnerJoin, note::Relation::Subject.def())
            .filter(subject::Column::SemesterId.eq(semester_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of download counters across all notes.
    pub async fn sum_downloads(&self) -> AppResult<i64> {
        let row = Note::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(downloads), 0)::BIGINT"), "total")
            .into_model::<DownloadTotal>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0, |r| r.total))
    }
}
