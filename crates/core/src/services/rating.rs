//! Rating service.

use notehub_common::{AppError, AppResult, IdGenerator};
use notehub_db::{
    entities::rating,
    repositories::{NoteRepository, RatingRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Arithmetic mean of rating scores. Empty input yields 0.
#[must_use]
pub fn mean_score(scores: &[i32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    f64::from(scores.iter().sum::<i32>()) / scores.len() as f64
}

/// Input for creating a rating.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRatingInput {
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,

    #[validate(email)]
    pub author_email: String,

    #[validate(range(min = 1, max = 5))]
    pub score: i32,
}

/// Rating service for business logic.
#[derive(Clone)]
pub struct RatingService {
    rating_repo: RatingRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub fn new(rating_repo: RatingRepository, note_repo: NoteRepository) -> Self {
        Self {
            rating_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a rating on a note.
    ///
    /// The note id comes from the URL, never from the body. One rating per
    /// (note, author email) pair; the unique index backs this check up
    /// against concurrent writers.
    pub async fn create(&self, note_id: &str, input: CreateRatingInput) -> AppResult<rating::Model> {
        input.validate()?;

        // Check the note exists
        self.note_repo.get_by_id(note_id).await?;

        if self
            .rating_repo
            .has_rated(note_id, &input.author_email)
            .await?
        {
            return Err(AppError::Validation(format!(
                "{} has already rated this note",
                input.author_email
            )));
        }

        let model = rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note_id.to_string()),
            author_name: Set(input.author_name),
            author_email: Set(input.author_email),
            score: Set(input.score),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.rating_repo.create(model).await
    }

    /// List all ratings, newest first (admin view).
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<rating::Model>, u64)> {
        self.rating_repo.list(page, per_page).await
    }

    /// Delete a rating (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.rating_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("rating {id}")))?;

        self.rating_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notehub_db::entities::note::{self, NoteType};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_note(id: &str) -> note::Model {
        note::Model {
            id: id.to_string(),
            subject_id: "sub1".to_string(),
            title: "Lecture 01".to_string(),
            description: "Notes for Lecture 01".to_string(),
            content: String::new(),
            file_path: None,
            file_name: None,
            thumbnail: None,
            tags: String::new(),
            chapter: String::new(),
            note_type: NoteType::Lecture,
            downloads: 0,
            is_featured: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_rating(id: &str, note_id: &str, email: &str, score: i32) -> rating::Model {
        rating::Model {
            id: id.to_string(),
            note_id: note_id.to_string(),
            author_name: "Reader".to_string(),
            author_email: email.to_string(),
            score,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_mean_score_empty_is_zero() {
        assert_eq!(mean_score(&[]), 0.0);
    }

    #[test]
    fn test_mean_score_three_and_five_is_four() {
        assert_eq!(mean_score(&[3, 5]), 4.0);
    }

    #[test]
    fn test_mean_score_is_plain_division() {
        assert!((mean_score(&[5, 4]) - 4.5).abs() < f64::EPSILON);
        assert!((mean_score(&[1, 1, 2]) - 4.0 / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_score() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = RatingService::new(
            RatingRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = CreateRatingInput {
            author_name: "Reader".to_string(),
            author_email: "reader@example.com".to_string(),
            score: 6,
        };

        let err = service.create("n1", input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_note() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );
        let service = RatingService::new(
            RatingRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = CreateRatingInput {
            author_name: "Reader".to_string(),
            author_email: "reader@example.com".to_string(),
            score: 4,
        };

        let err = service.create("missing", input).await.unwrap_err();
        assert!(matches!(err, AppError::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note("n1")]])
                .append_query_results([[test_rating("r1", "n1", "reader@example.com", 4)]])
                .into_connection(),
        );
        let service = RatingService::new(
            RatingRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = CreateRatingInput {
            author_name: "Reader".to_string(),
            author_email: "reader@example.com".to_string(),
            score: 5,
        };

        let err = service.create("n1", input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_inserts_rating() {
        let inserted = test_rating("r1", "n1", "reader@example.com", 4);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note("n1")]])
                .append_query_results([Vec::<rating::Model>::new()])
                .append_query_results([[inserted]])
                .into_connection(),
        );
        let service = RatingService::new(
            RatingRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = CreateRatingInput {
            author_name: "Reader".to_string(),
            author_email: "reader@example.com".to_string(),
            score: 4,
        };

        let rating = service.create("n1", input).await.unwrap();
        assert_eq!(rating.score, 4);
        assert_eq!(rating.note_id, "n1");
    }
}
