//! Note service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::services::rating::mean_score;
use bytes::Bytes;
use notehub_common::{AppError, AppResult, IdGenerator, StorageBackend, generate_storage_key};
use notehub_db::{
    entities::{
        comment,
        note::{self, NoteType},
        rating,
    },
    repositories::{
        CommentRepository, NoteFilter, NoteRepository, RatingRepository, SemesterRepository,
        SubjectRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Input for creating a note (admin, single record).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteInput {
    pub subject_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    /// Comma-separated tags
    #[validate(length(max = 200))]
    #[serde(default)]
    pub tags: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub chapter: String,

    #[serde(default = "default_note_type")]
    pub note_type: NoteType,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Input for updating a note (admin, single record, no file field).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub content: Option<String>,

    #[validate(length(max = 200))]
    pub tags: Option<String>,

    #[validate(length(max = 100))]
    pub chapter: Option<String>,

    pub note_type: Option<NoteType>,

    pub is_featured: Option<bool>,

    pub thumbnail: Option<String>,
}

/// Shared fields applied to every note in a bulk upload.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUploadInput {
    pub subject_id: String,

    #[serde(default = "default_note_type")]
    pub note_type: NoteType,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub chapter: String,

    #[validate(length(max = 200))]
    #[serde(default)]
    pub tags: String,
}

/// One uploaded file in a bulk upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename.
    pub name: String,
    /// File content.
    pub data: Bytes,
}

const fn default_note_type() -> NoteType {
    NoteType::Lecture
}

/// A note with its derived fields and owning-subject info.
#[derive(Debug, Clone)]
pub struct NoteSummary {
    pub note: note::Model,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub subject_name: String,
    pub subject_code: String,
}

/// Full note detail with nested comments and ratings.
#[derive(Debug, Clone)]
pub struct NoteDetail {
    pub note: note::Model,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub subject_name: String,
    pub subject_code: String,
    pub semester_number: i32,
    pub comments: Vec<comment::Model>,
    pub ratings: Vec<rating::Model>,
}

/// Derive a note title from an uploaded filename.
///
/// Strips the extension, turns underscores and hyphens into spaces and
/// title-cases each word: `lecture_01.pdf` becomes `Lecture 01`.
#[must_use]
pub fn title_from_filename(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };

    stem.replace(['_', '-'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |c| {
                c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Note service for business logic.
#[derive(Clone)]
pub struct NoteService {
    note_repo: NoteRepository,
    subject_repo: SubjectRepository,
    semester_repo: SemesterRepository,
    comment_repo: CommentRepository,
    rating_repo: RatingRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl NoteService {
    /// Create a new note service.
    #[must_use]
    pub fn new(
        note_repo: NoteRepository,
        subject_repo: SubjectRepository,
        semester_repo: SemesterRepository,
        comment_repo: CommentRepository,
        rating_repo: RatingRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            note_repo,
            subject_repo,
            semester_repo,
            comment_repo,
            rating_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// List notes matching the filter, newest first, with derived fields.
    pub async fn list(
        &self,
        filter: NoteFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<NoteSummary>, u64)> {
        let (notes, count) = self.note_repo.list(filter, page, per_page).await?;
        let summaries = self.assemble_summaries(notes).await?;
        Ok((summaries, count))
    }

    /// All notes of one subject, newest first, with derived fields.
    pub async fn list_by_subject(&self, subject_id: &str) -> AppResult<Vec<NoteSummary>> {
        let notes = self.note_repo.list_by_subject(subject_id).await?;
        self.assemble_summaries(notes).await
    }

    /// Featured notes, newest first, up to `limit`.
    pub async fn featured(&self, limit: u64) -> AppResult<Vec<NoteSummary>> {
        let notes = self.note_repo.list_featured(limit).await?;
        self.assemble_summaries(notes).await
    }

    /// Fetch one note with nested comments, ratings and catalog context.
    pub async fn get(&self, id: &str) -> AppResult<NoteDetail> {
        let note = self.note_repo.get_by_id(id).await?;

        let subject = self
            .subject_repo
            .find_by_id(&note.subject_id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(note.subject_id.clone()))?;

        let semester = self
            .semester_repo
            .find_by_id(&subject.semester_id)
            .await?
            .ok_or_else(|| AppError::SemesterNotFound(subject.semester_id.clone()))?;

        let comments = self.comment_repo.list_by_note(id).await?;
        let ratings = self.rating_repo.list_by_note(id).await?;

        let scores: Vec<i32> = ratings.iter().map(|r| r.score).collect();

        Ok(NoteDetail {
            note,
            average_rating: mean_score(&scores),
            total_ratings: scores.len() as u64,
            subject_name: subject.name,
            subject_code: subject.code,
            semester_number: semester.number,
            comments,
            ratings,
        })
    }

    /// Create a note (admin, single record).
    pub async fn create(&self, input: CreateNoteInput) -> AppResult<note::Model> {
        input.validate()?;

        self.subject_repo
            .find_by_id(&input.subject_id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(input.subject_id.clone()))?;

        let model = note::ActiveModel {
            id: Set(self.id_gen.generate()),
            subject_id: Set(input.subject_id),
            title: Set(input.title),
            description: Set(input.description),
            content: Set(input.content),
            file_path: Set(None),
            file_name: Set(None),
            thumbnail: Set(input.thumbnail),
            tags: Set(input.tags),
            chapter: Set(input.chapter),
            note_type: Set(input.note_type),
            downloads: Set(0),
            is_featured: Set(input.is_featured),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.note_repo.create(model).await
    }

    /// Update a note in place (admin, single record, no file changes).
    pub async fn update(&self, id: &str, input: UpdateNoteInput) -> AppResult<note::Model> {
        input.validate()?;

        let note = self.note_repo.get_by_id(id).await?;
        let mut active: note::ActiveModel = note.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(tags) = input.tags {
            active.tags = Set(tags);
        }
        if let Some(chapter) = input.chapter {
            active.chapter = Set(chapter);
        }
        if let Some(note_type) = input.note_type {
            active.note_type = Set(note_type);
        }
        if let Some(is_featured) = input.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(thumbnail) = input.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.note_repo.update(active).await
    }

    /// Delete a note. Its comments and ratings cascade away with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.note_repo.get_by_id(id).await?;
        self.note_repo.delete(id).await
    }

    /// Set or clear the featured flag.
    pub async fn set_featured(&self, id: &str, featured: bool) -> AppResult<note::Model> {
        let note = self.note_repo.get_by_id(id).await?;
        let mut active: note::ActiveModel = note.into();
        active.is_featured = Set(featured);
        self.note_repo.update(active).await
    }

    /// Add one to the download counter and return the new value.
    ///
    /// Streaming a download never calls this; the counter moves only
    /// through this operation, one step per call.
    pub async fn increment_downloads(&self, id: &str) -> AppResult<i64> {
        self.note_repo.get_by_id(id).await?;
        self.note_repo.increment_downloads(id).await?;

        let note = self.note_repo.get_by_id(id).await?;
        Ok(note.downloads)
    }

    /// Create one note per uploaded file, sharing subject, type, chapter
    /// and tags across the batch.
    ///
    /// Each file is persisted and inserted independently; a failure midway
    /// leaves the earlier notes in place.
    pub async fn bulk_create(
        &self,
        input: BulkUploadInput,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<note::Model>> {
        input.validate()?;

        self.subject_repo
            .find_by_id(&input.subject_id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(input.subject_id.clone()))?;

        let mut created = Vec::with_capacity(files.len());

        for file in files {
            if file.name.is_empty() {
                continue;
            }

            let key = generate_storage_key("notes", &file.name);
            self.storage.upload(&key, &file.data).await?;

            let title = title_from_filename(&file.name);
            let description = format!("Notes for {title}");

            let model = note::ActiveModel {
                id: Set(self.id_gen.generate()),
                subject_id: Set(input.subject_id.clone()),
                title: Set(title),
                description: Set(description),
                content: Set(String::new()),
                file_path: Set(Some(key)),
                file_name: Set(Some(file.name)),
                thumbnail: Set(None),
                tags: Set(input.tags.clone()),
                chapter: Set(input.chapter.clone()),
                note_type: Set(input.note_type),
                downloads: Set(0),
                is_featured: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            };

            created.push(self.note_repo.create(model).await?);
        }

        info!(count = created.len(), subject_id = %input.subject_id, "Bulk upload created notes");

        Ok(created)
    }

    /// Attach derived fields and owning-subject info to a batch of notes.
    async fn assemble_summaries(&self, notes: Vec<note::Model>) -> AppResult<Vec<NoteSummary>> {
        if notes.is_empty() {
            return Ok(vec![]);
        }

        let subject_ids: Vec<String> = notes
            .iter()
            .map(|n| n.subject_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let subjects = self.subject_repo.find_by_ids(&subject_ids).await?;
        let subject_info: HashMap<String, (String, String)> = subjects
            .into_iter()
            .map(|s| (s.id, (s.name, s.code)))
            .collect();

        let note_ids: Vec<String> = notes.iter().map(|n| n.id.clone()).collect();
        let ratings = self.rating_repo.list_by_note_ids(&note_ids).await?;

        let mut scores_by_note: HashMap<String, Vec<i32>> = HashMap::new();
        for rating in ratings {
            scores_by_note.entry(rating.note_id).or_default().push(rating.score);
        }

        Ok(notes
            .into_iter()
            .map(|note| {
                let scores = scores_by_note.remove(&note.id).unwrap_or_default();
                let (subject_name, subject_code) = subject_info
                    .get(&note.subject_id)
                    .cloned()
                    .unwrap_or_default();

                NoteSummary {
                    average_rating: mean_score(&scores),
                    total_ratings: scores.len() as u64,
                    subject_name,
                    subject_code,
                    note,
                }
            })
            .collect())
    }
}
