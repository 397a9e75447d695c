//! Subject service.

use std::collections::HashMap;

use crate::services::note::{NoteService, NoteSummary};
use crate::services::rating::mean_score;
use notehub_common::{AppError, AppResult, IdGenerator};
use notehub_db::{
    entities::subject,
    repositories::{NoteRepository, RatingRepository, SemesterRepository, SubjectRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a subject (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectInput {
    pub semester_id: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 20))]
    pub code: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_credits")]
    pub credits: i32,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating a subject (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,

    pub description: Option<String>,

    pub credits: Option<i32>,

    pub thumbnail: Option<String>,

    pub is_active: Option<bool>,
}

const fn default_credits() -> i32 {
    3
}

const fn default_true() -> bool {
    true
}

/// A subject with its derived fields.
#[derive(Debug, Clone)]
pub struct SubjectSummary {
    pub subject: subject::Model,
    pub total_notes: u64,
    pub total_downloads: i64,
    pub average_rating: f64,
    pub semester_number: i32,
}

/// Full subject detail with nested notes.
#[derive(Debug, Clone)]
pub struct SubjectDetail {
    pub subject: subject::Model,
    pub total_notes: u64,
    pub total_downloads: i64,
    pub average_rating: f64,
    pub semester_number: i32,
    pub semester_name: String,
    pub notes: Vec<NoteSummary>,
}

/// Subject service for business logic.
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    semester_repo: SemesterRepository,
    note_repo: NoteRepository,
    rating_repo: RatingRepository,
    note_service: NoteService,
    id_gen: IdGenerator,
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub fn new(
        subject_repo: SubjectRepository,
        semester_repo: SemesterRepository,
        note_repo: NoteRepository,
        rating_repo: RatingRepository,
        note_service: NoteService,
    ) -> Self {
        Self {
            subject_repo,
            semester_repo,
            note_repo,
            rating_repo,
            note_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Derive counts and averages for one subject.
    ///
    /// The average is the mean of the per-note average ratings, where a
    /// note with no ratings contributes 0. No notes means 0 overall.
    pub async fn summarize_with_semester(
        &self,
        subject: subject::Model,
        semester_number: i32,
    ) -> AppResult<SubjectSummary> {
        let notes = self.note_repo.list_by_subject(&subject.id).await?;
        let note_ids: Vec<String> = notes.iter().map(|n| n.id.clone()).collect();
        let ratings = self.rating_repo.list_by_note_ids(&note_ids).await?;

        let mut scores_by_note: HashMap<String, Vec<i32>> = HashMap::new();
        for rating in ratings {
            scores_by_note.entry(rating.note_id).or_default().push(rating.score);
        }

        let total_downloads = notes.iter().map(|n| n.downloads).sum();

        let per_note_averages: Vec<f64> = notes
            .iter()
            .map(|n| scores_by_note.get(&n.id).map_or(0.0, |s| mean_score(s)))
            .collect();
        let average_rating = if per_note_averages.is_empty() {
            0.0
        } else {
            per_note_averages.iter().sum::<f64>() / per_note_averages.len() as f64
        };

        Ok(SubjectSummary {
            total_notes: notes.len() as u64,
            total_downloads,
            average_rating,
            semester_number,
            subject,
        })
    }

    /// Derive counts and averages, looking the owning semester up first.
    pub async fn summarize(&self, subject: subject::Model) -> AppResult<SubjectSummary> {
        let semester = self
            .semester_repo
            .find_by_id(&subject.semester_id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(subject.semester_id.clone()))?;

        self.summarize_with_semester(subject, semester.number).await
    }

    /// List active subjects ordered by code, with derived fields.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<SubjectSummary>, u64)> {
        let (subjects, count) = self.subject_repo.list_active(page, per_page).await?;

        let mut summaries = Vec::with_capacity(subjects.len());
        for subject in subjects {
            summaries.push(self.summarize(subject).await?);
        }

        Ok((summaries, count))
    }

    /// Active subjects of the semester with the given number.
    pub async fn list_for_semester_number(
        &self,
        number: i32,
    ) -> AppResult<Vec<SubjectSummary>> {
        let semester = self
            .semester_repo
            .find_by_number(number)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::SemesterNotFound(number.to_string()))?;

        let subjects = self.subject_repo.list_active_by_semester(&semester.id).await?;

        let mut summaries = Vec::with_capacity(subjects.len());
        for subject in subjects {
            summaries.push(
                self.summarize_with_semester(subject, semester.number)
                    .await?,
            );
        }

        Ok(summaries)
    }

    /// Fetch one active subject with derived fields and nested notes.
    pub async fn get(&self, id: &str) -> AppResult<SubjectDetail> {
        let subject = self
            .subject_repo
            .find_by_id(id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::SubjectNotFound(id.to_string()))?;

        let semester = self
            .semester_repo
            .find_by_id(&subject.semester_id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(subject.semester_id.clone()))?;

        let notes = self.note_service.list_by_subject(&subject.id).await?;
        let summary = self
            .summarize_with_semester(subject, semester.number)
            .await?;

        Ok(SubjectDetail {
            subject: summary.subject,
            total_notes: summary.total_notes,
            total_downloads: summary.total_downloads,
            average_rating: summary.average_rating,
            semester_number: summary.semester_number,
            semester_name: semester.name,
            notes,
        })
    }

    /// Fetch one subject by internal id, active or not (admin view).
    pub async fn get_admin(&self, id: &str) -> AppResult<SubjectSummary> {
        let subject = self
            .subject_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(id.to_string()))?;

        self.summarize(subject).await
    }

    /// List every subject, active or not (admin view).
    pub async fn list_all(&self) -> AppResult<Vec<SubjectSummary>> {
        let subjects = self.subject_repo.list_all().await?;

        let mut summaries = Vec::with_capacity(subjects.len());
        for subject in subjects {
            summaries.push(self.summarize(subject).await?);
        }

        Ok(summaries)
    }

    /// Create a subject (admin). Duplicate codes are rejected.
    pub async fn create(&self, input: CreateSubjectInput) -> AppResult<subject::Model> {
        input.validate()?;

        self.semester_repo
            .find_by_id(&input.semester_id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(input.semester_id.clone()))?;

        if self.subject_repo.code_exists(&input.code, None).await? {
            return Err(AppError::Validation(format!(
                "subject with code {} already exists",
                input.code
            )));
        }

        let model = subject::ActiveModel {
            id: Set(self.id_gen.generate()),
            semester_id: Set(input.semester_id),
            name: Set(input.name),
            code: Set(input.code),
            description: Set(input.description),
            credits: Set(input.credits),
            thumbnail: Set(input.thumbnail),
            is_active: Set(input.is_active),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.subject_repo.create(model).await
    }

    /// Update a subject in place (admin).
    pub async fn update(&self, id: &str, input: UpdateSubjectInput) -> AppResult<subject::Model> {
        input.validate()?;

        let subject = self
            .subject_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(id.to_string()))?;

        if let Some(code) = &input.code
            && self.subject_repo.code_exists(code, Some(id)).await?
        {
            return Err(AppError::Validation(format!(
                "subject with code {code} already exists"
            )));
        }

        let mut active: subject::ActiveModel = subject.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(credits) = input.credits {
            active.credits = Set(credits);
        }
        if let Some(thumbnail) = input.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        self.subject_repo.update(active).await
    }

    /// Delete a subject and everything beneath it (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.subject_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(id.to_string()))?;

        self.subject_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notehub_common::LocalStorage;
    use notehub_db::entities::{
        note::{self, NoteType},
        rating, semester,
    };
    use notehub_db::repositories::CommentRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_semester(id: &str, number: i32) -> semester::Model {
        semester::Model {
            id: id.to_string(),
            number,
            name: format!("Semester {number}"),
            description: String::new(),
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    fn test_subject(id: &str, code: &str) -> subject::Model {
        subject::Model {
            id: id.to_string(),
            semester_id: "s1".to_string(),
            name: format!("Subject {code}"),
            code: code.to_string(),
            description: String::new(),
            credits: 3,
            thumbnail: None,
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    fn test_note(id: &str, subject_id: &str, downloads: i64) -> note::Model {
        note::Model {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            title: "Lecture".to_string(),
            description: String::new(),
            content: String::new(),
            file_path: None,
            file_name: None,
            thumbnail: None,
            tags: String::new(),
            chapter: String::new(),
            note_type: NoteType::Lecture,
            downloads,
            is_featured: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_rating(id: &str, note_id: &str, score: i32) -> rating::Model {
        rating::Model {
            id: id.to_string(),
            note_id: note_id.to_string(),
            author_name: "Reader".to_string(),
            author_email: format!("{id}@example.com"),
            score,
            created_at: Utc::now().into(),
        }
    }

    fn service_over(db: Arc<sea_orm::DatabaseConnection>) -> SubjectService {
        let storage_dir =
            std::env::temp_dir().join(format!("notehub-subjects-{}", uuid::Uuid::new_v4()));
        let note_service = NoteService::new(
            NoteRepository::new(db.clone()),
            SubjectRepository::new(db.clone()),
            SemesterRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            RatingRepository::new(db.clone()),
            Arc::new(LocalStorage::new(storage_dir, "/media".to_string())),
        );
        SubjectService::new(
            SubjectRepository::new(db.clone()),
            SemesterRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            RatingRepository::new(db),
            note_service,
        )
    }

    #[tokio::test]
    async fn test_summarize_totals_and_average() {
        // Notes: n1 rated [3, 5] -> 4.0, n2 unrated -> 0; subject mean 2.0
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note("n1", "sub1", 7), test_note("n2", "sub1", 3)]])
                .append_query_results([[test_rating("r1", "n1", 3), test_rating("r2", "n1", 5)]])
                .into_connection(),
        );
        let service = service_over(db);

        let summary = service
            .summarize_with_semester(test_subject("sub1", "CS101"), 1)
            .await
            .unwrap();

        assert_eq!(summary.total_notes, 2);
        assert_eq!(summary.total_downloads, 10);
        assert_eq!(summary.average_rating, 2.0);
        assert_eq!(summary.semester_number, 1);
    }

    #[tokio::test]
    async fn test_summarize_no_notes_average_is_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );
        let service = service_over(db);

        let summary = service
            .summarize_with_semester(test_subject("sub1", "CS101"), 2)
            .await
            .unwrap();

        assert_eq!(summary.total_notes, 0);
        assert_eq!(summary.total_downloads, 0);
        assert_eq!(summary.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_get_inactive_subject_is_404() {
        let mut inactive = test_subject("sub1", "CS101");
        inactive.is_active = false;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );
        let service = service_over(db);

        let err = service.get("sub1").await.unwrap_err();
        assert!(matches!(err, AppError::SubjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_duplicate_code_is_validation_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_semester("s1", 1)]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let service = service_over(db);

        let input = CreateSubjectInput {
            semester_id: "s1".to_string(),
            name: "Data Structures".to_string(),
            code: "CS101".to_string(),
            description: String::new(),
            credits: 3,
            thumbnail: None,
            is_active: true,
        };

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_for_semester_number_unknown_is_404() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<semester::Model>::new()])
                .into_connection(),
        );
        let service = service_over(db);

        let err = service.list_for_semester_number(9).await.unwrap_err();
        assert!(matches!(err, AppError::SemesterNotFound(_)));
    }
}
