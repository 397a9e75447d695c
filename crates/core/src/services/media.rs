//! Media service for note file delivery.

use std::sync::Arc;

use notehub_common::{AppError, AppResult, StorageBackend};
use notehub_db::repositories::NoteRepository;

/// A file ready to be streamed back as an attachment.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub data: Vec<u8>,
    pub file_name: String,
}

/// A file ready to be served with a browser-appropriate content type.
#[derive(Debug, Clone)]
pub struct ServedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
    /// Whether the browser can render this type directly.
    pub inline: bool,
}

/// Map a file extension to a content type.
///
/// Anything unrecognized falls back to a generic binary type.
#[must_use]
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Whether a browser renders the content type directly.
#[must_use]
pub fn renders_inline(content_type: &str) -> bool {
    content_type == "application/pdf"
        || content_type == "text/plain"
        || content_type.starts_with("image/")
}

fn extension_of(path: &str) -> &str {
    path.rsplit_once('.').map_or("", |(_, ext)| ext)
}

fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Media service: locates a note's stored file and reads it back.
#[derive(Clone)]
pub struct MediaService {
    note_repo: NoteRepository,
    storage: Arc<dyn StorageBackend>,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(note_repo: NoteRepository, storage: Arc<dyn StorageBackend>) -> Self {
        Self { note_repo, storage }
    }

    /// Read a note's file for attachment download.
    ///
    /// The file handle is scoped to the read; nothing stays open after
    /// this returns. Missing note, missing path and missing bytes on disk
    /// all surface as not-found.
    pub async fn download(&self, note_id: &str) -> AppResult<FilePayload> {
        let note = self.note_repo.get_by_id(note_id).await?;

        let file_path = note
            .file_path
            .ok_or_else(|| AppError::FileNotFound(note_id.to_string()))?;

        let data = self.storage.read(&file_path).await?;

        let file_name = note
            .file_name
            .unwrap_or_else(|| file_name_of(&file_path).to_string());

        Ok(FilePayload { data, file_name })
    }

    /// Read a note's file for inline viewing.
    ///
    /// The content type comes from the stored file's extension; types a
    /// browser renders natively are marked inline, the rest download as
    /// attachments.
    pub async fn serve(&self, note_id: &str) -> AppResult<ServedFile> {
        let note = self.note_repo.get_by_id(note_id).await?;

        let file_path = note
            .file_path
            .ok_or_else(|| AppError::FileNotFound(note_id.to_string()))?;

        let data = self.storage.read(&file_path).await?;

        let content_type = content_type_for(extension_of(&file_path));
        let file_name = note
            .file_name
            .unwrap_or_else(|| file_name_of(&file_path).to_string());

        Ok(ServedFile {
            data,
            file_name,
            content_type,
            inline: renders_inline(content_type),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notehub_common::LocalStorage;
    use notehub_db::entities::note::{self, NoteType};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_note(id: &str, file_path: Option<&str>, file_name: Option<&str>) -> note::Model {
        note::Model {
            id: id.to_string(),
            subject_id: "sub1".to_string(),
            title: "Lecture 01".to_string(),
            description: String::new(),
            content: String::new(),
            file_path: file_path.map(ToString::to_string),
            file_name: file_name.map(ToString::to_string),
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

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert_eq!(content_type_for("PDF"), "application/pdf");
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
        assert_eq!(content_type_for("csv"), "text/csv");
        assert_eq!(
            content_type_for("docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_content_type_for_unknown_is_binary() {
        assert_eq!(content_type_for("zip"), "application/octet-stream");
        assert_eq!(content_type_for(""), "application/octet-stream");
    }

    #[test]
    fn test_renders_inline() {
        assert!(renders_inline("application/pdf"));
        assert!(renders_inline("image/png"));
        assert!(renders_inline("text/plain"));
        assert!(!renders_inline("application/msword"));
        assert!(!renders_inline("application/octet-stream"));
    }

    #[tokio::test]
    async fn test_download_note_without_file_is_404() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note("n1", None, None)]])
                .into_connection(),
        );
        let dir = std::env::temp_dir().join(format!("notehub-media-{}", uuid::Uuid::new_v4()));
        let service = MediaService::new(
            NoteRepository::new(db),
            Arc::new(LocalStorage::new(dir, "/media".to_string())),
        );

        let err = service.download("n1").await.unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_download_missing_on_disk_is_404() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note(
                    "n1",
                    Some("notes/gone.pdf"),
                    Some("gone.pdf"),
                )]])
                .into_connection(),
        );
        let dir = std::env::temp_dir().join(format!("notehub-media-{}", uuid::Uuid::new_v4()));
        let service = MediaService::new(
            NoteRepository::new(db),
            Arc::new(LocalStorage::new(dir, "/media".to_string())),
        );

        let err = service.download("n1").await.unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_serve_reads_file_and_picks_type() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_note(
                    "n1",
                    Some("notes/lecture_01.pdf"),
                    Some("lecture_01.pdf"),
                )]])
                .into_connection(),
        );

        let dir = std::env::temp_dir().join(format!("notehub-media-{}", uuid::Uuid::new_v4()));
        let storage = Arc::new(LocalStorage::new(dir.clone(), "/media".to_string()));
        storage
            .upload("notes/lecture_01.pdf", b"%PDF-1.4")
            .await
            .unwrap();

        let service = MediaService::new(NoteRepository::new(db), storage);

        let served = service.serve("n1").await.unwrap();
        assert_eq!(served.content_type, "application/pdf");
        assert!(served.inline);
        assert_eq!(served.file_name, "lecture_01.pdf");
        assert_eq!(served.data, b"%PDF-1.4");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
