//! Comment service.

use notehub_common::{AppError, AppResult, IdGenerator};
use notehub_db::{
    entities::comment,
    repositories::{CommentRepository, NoteRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,

    #[validate(email)]
    pub author_email: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, note_repo: NoteRepository) -> Self {
        Self {
            comment_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a note.
    ///
    /// The note id comes from the URL, never from the body.
    pub async fn create(
        &self,
        note_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // Check the note exists
        self.note_repo.get_by_id(note_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note_id.to_string()),
            author_name: Set(input.author_name),
            author_email: Set(input.author_email),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.comment_repo.create(model).await
    }

    /// List all comments, newest first (admin view).
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<comment::Model>, u64)> {
        self.comment_repo.list(page, per_page).await
    }

    /// Delete a comment (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

        self.comment_repo.delete(id).await
    }
}
