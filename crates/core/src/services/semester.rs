//! Semester service.

use crate::services::subject::{SubjectService, SubjectSummary};
use notehub_common::{AppError, AppResult, IdGenerator};
use notehub_db::{
    entities::semester,
    repositories::{NoteRepository, SemesterRepository, SubjectRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a semester (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSemesterInput {
    #[validate(range(min = 1, max = 8))]
    pub number: i32,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating a semester (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSemesterInput {
    #[validate(range(min = 1, max = 8))]
    pub number: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

const fn default_true() -> bool {
    true
}

/// A semester with its derived counts.
#[derive(Debug, Clone)]
pub struct SemesterWithStats {
    pub semester: semester::Model,
    pub total_subjects: u64,
    pub total_notes: u64,
}

/// Full semester detail with nested subjects.
#[derive(Debug, Clone)]
pub struct SemesterDetail {
    pub semester: semester::Model,
    pub total_subjects: u64,
    pub total_notes: u64,
    pub subjects: Vec<SubjectSummary>,
}

/// Semester service for business logic.
#[derive(Clone)]
pub struct SemesterService {
    semester_repo: SemesterRepository,
    subject_repo: SubjectRepository,
    note_repo: NoteRepository,
    subject_service: SubjectService,
    id_gen: IdGenerator,
}

impl SemesterService {
    /// Create a new semester service.
    #[must_use]
    pub fn new(
        semester_repo: SemesterRepository,
        subject_repo: SubjectRepository,
        note_repo: NoteRepository,
        subject_service: SubjectService,
    ) -> Self {
        Self {
            semester_repo,
            subject_repo,
            note_repo,
            subject_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Derive subject and note counts for one semester.
    async fn with_stats(&self, semester: semester::Model) -> AppResult<SemesterWithStats> {
        let total_subjects = self.subject_repo.count_by_semester(&semester.id).await?;
        let total_notes = self.note_repo.count_by_semester(&semester.id).await?;

        Ok(SemesterWithStats {
            semester,
            total_subjects,
            total_notes,
        })
    }

    /// List active semesters ordered by number, with derived counts.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<SemesterWithStats>, u64)> {
        let (semesters, count) = self.semester_repo.list_active(page, per_page).await?;

        let mut items = Vec::with_capacity(semesters.len());
        for semester in semesters {
            items.push(self.with_stats(semester).await?);
        }

        Ok((items, count))
    }

    /// Fetch one active semester by its number, with nested subjects.
    pub async fn get_by_number(&self, number: i32) -> AppResult<SemesterDetail> {
        let semester = self
            .semester_repo
            .find_by_number(number)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::SemesterNotFound(number.to_string()))?;

        let subjects = self.subject_repo.list_by_semester(&semester.id).await?;

        let mut summaries = Vec::with_capacity(subjects.len());
        for subject in subjects {
            summaries.push(
                self.subject_service
                    .summarize_with_semester(subject, semester.number)
                    .await?,
            );
        }

        let stats = self.with_stats(semester).await?;

        Ok(SemesterDetail {
            semester: stats.semester,
            total_subjects: stats.total_subjects,
            total_notes: stats.total_notes,
            subjects: summaries,
        })
    }

    /// Fetch one semester by internal id, active or not (admin view).
    pub async fn get_admin(&self, id: &str) -> AppResult<SemesterWithStats> {
        let semester = self
            .semester_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(id.to_string()))?;

        self.with_stats(semester).await
    }

    /// List every semester, active or not (admin view).
    pub async fn list_all(&self) -> AppResult<Vec<SemesterWithStats>> {
        let semesters = self.semester_repo.list_all().await?;

        let mut items = Vec::with_capacity(semesters.len());
        for semester in semesters {
            items.push(self.with_stats(semester).await?);
        }

        Ok(items)
    }

    /// Create a semester (admin). Duplicate numbers are rejected.
    pub async fn create(&self, input: CreateSemesterInput) -> AppResult<semester::Model> {
        input.validate()?;

        if self.semester_repo.number_exists(input.number, None).await? {
            return Err(AppError::Validation(format!(
                "semester with number {} already exists",
                input.number
            )));
        }

        let model = semester::ActiveModel {
            id: Set(self.id_gen.generate()),
            number: Set(input.number),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(input.is_active),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.semester_repo.create(model).await
    }

    /// Update a semester in place (admin).
    pub async fn update(&self, id: &str, input: UpdateSemesterInput) -> AppResult<semester::Model> {
        input.validate()?;

        let semester = self
            .semester_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(id.to_string()))?;

        if let Some(number) = input.number
            && self.semester_repo.number_exists(number, Some(id)).await?
        {
            return Err(AppError::Validation(format!(
                "semester with number {number} already exists"
            )));
        }

        let mut active: semester::ActiveModel = semester.into();

        if let Some(number) = input.number {
            active.number = Set(number);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        self.semester_repo.update(active).await
    }

    /// Delete a semester and everything beneath it (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.semester_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(id.to_string()))?;

        self.semester_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::note::NoteService;
    use chrono::Utc;
    use notehub_common::LocalStorage;
    use notehub_db::repositories::{CommentRepository, RatingRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_semester(id: &str, number: i32, is_active: bool) -> semester::Model {
        semester::Model {
            id: id.to_string(),
            number,
            name: format!("Semester {number}"),
            description: String::new(),
            is_active,
            created_at: Utc::now().into(),
        }
    }

    fn service_over(db: Arc<sea_orm::DatabaseConnection>) -> SemesterService {
        let storage_dir =
            std::env::temp_dir().join(format!("notehub-semesters-{}", uuid::Uuid::new_v4()));
        let note_service = NoteService::new(
            NoteRepository::new(db.clone()),
            SubjectRepository::new(db.clone()),
            SemesterRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            RatingRepository::new(db.clone()),
            Arc::new(LocalStorage::new(storage_dir, "/media".to_string())),
        );
        let subject_service = SubjectService::new(
            SubjectRepository::new(db.clone()),
            SemesterRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            RatingRepository::new(db.clone()),
            note_service,
        );
        SemesterService::new(
            SemesterRepository::new(db.clone()),
            SubjectRepository::new(db.clone()),
            NoteRepository::new(db),
            subject_service,
        )
    }

    #[tokio::test]
    async fn test_create_duplicate_number_is_validation_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let service = service_over(db);

        let input = CreateSemesterInput {
            number: 3,
            name: "Third Semester".to_string(),
            description: String::new(),
            is_active: true,
        };

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_number() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service_over(db);

        let input = CreateSemesterInput {
            number: 9,
            name: "Ninth Semester".to_string(),
            description: String::new(),
            is_active: true,
        };

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_by_number_inactive_is_404() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_semester("s1", 2, false)]])
                .into_connection(),
        );
        let service = service_over(db);

        let err = service.get_by_number(2).await.unwrap_err();
        assert!(matches!(err, AppError::SemesterNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_attaches_counts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // page count, page rows, then per-semester subject/note counts
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .append_query_results([[test_semester("s1", 1, true)]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(12))
                }]])
                .into_connection(),
        );
        let service = service_over(db);

        let (items, count) = service.list(1, 20).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(items[0].total_subjects, 4);
        assert_eq!(items[0].total_notes, 12);
    }
}
