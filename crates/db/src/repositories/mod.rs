//! Database repositories.

pub mod comment;
pub mod feedback;
pub mod note;
pub mod rating;
pub mod semester;
pub mod subject;

pub use comment::CommentRepository;
pub use feedback::FeedbackRepository;
pub use note::{NoteFilter, NoteRepository};
pub use rating::RatingRepository;
pub use semester::SemesterRepository;
pub use subject::SubjectRepository;
