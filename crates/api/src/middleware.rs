//! API middleware and shared state.

#![allow(missing_docs)]

use notehub_core::{
    CommentService, FeedbackService, MediaService, NoteService, RatingService, SemesterService,
    StatsService, SubjectService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub semester_service: SemesterService,
    pub subject_service: SubjectService,
    pub note_service: NoteService,
    pub comment_service: CommentService,
    pub rating_service: RatingService,
    pub feedback_service: FeedbackService,
    pub stats_service: StatsService,
    pub media_service: MediaService,
}
