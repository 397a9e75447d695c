//! Platform statistics service.

use notehub_common::AppResult;
use notehub_db::repositories::{
    CommentRepository, NoteRepository, RatingRepository, SemesterRepository, SubjectRepository,
};
use serde::Serialize;

/// The six-counter platform summary.
///
/// Recomputed from the store on every call; nothing here is cached.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_semesters: u64,
    pub total_subjects: u64,
    pub total_notes: u64,
    pub total_downloads: i64,
    pub total_comments: u64,
    pub total_ratings: u64,
}

/// Stats service for read-only aggregation.
#[derive(Clone)]
pub struct StatsService {
    semester_repo: SemesterRepository,
    subject_repo: SubjectRepository,
    note_repo: NoteRepository,
    comment_repo: CommentRepository,
    rating_repo: RatingRepository,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(
        semester_repo: SemesterRepository,
        subject_repo: SubjectRepository,
        note_repo: NoteRepository,
        comment_repo: CommentRepository,
        rating_repo: RatingRepository,
    ) -> Self {
        Self {
            semester_repo,
            subject_repo,
            note_repo,
            comment_repo,
            rating_repo,
        }
    }

    /// Compute the summary counters.
    ///
    /// Semesters and subjects count only active rows; notes, downloads,
    /// comments and ratings count everything.
    pub async fn summary(&self) -> AppResult<StatsSummary> {
        let total_semesters = self.semester_repo.count_active().await?;
        let total_subjects = self.subject_repo.count_active().await?;
        let total_notes = self.note_repo.count_all().await?;
        let total_downloads = self.note_repo.sum_downloads().await?;
        let total_comments = self.comment_repo.count_all().await?;
        let total_ratings = self.rating_repo.count_all().await?;

        Ok(StatsSummary {
            total_semesters,
            total_subjects,
            total_notes,
            total_downloads,
            total_comments,
            total_ratings,
        })
    }
}
