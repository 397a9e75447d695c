//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod feedback;
pub mod media;
pub mod note;
pub mod rating;
pub mod semester;
pub mod stats;
pub mod subject;

pub use comment::{CommentService, CreateCommentInput};
pub use feedback::{CreateFeedbackInput, FeedbackService};
pub use media::{FilePayload, MediaService, ServedFile, content_type_for, renders_inline};
pub use note::{
    BulkUploadInput, CreateNoteInput, NoteDetail, NoteService, NoteSummary, UpdateNoteInput,
    UploadFile, title_from_filename,
};
pub use rating::{CreateRatingInput, RatingService, mean_score};
pub use semester::{
    CreateSemesterInput, SemesterDetail, SemesterService, SemesterWithStats, UpdateSemesterInput,
};
pub use stats::{StatsService, StatsSummary};
pub use subject::{
    CreateSubjectInput, SubjectDetail, SubjectService, SubjectSummary, UpdateSubjectInput,
};
