//! Note entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of study material a note can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    #[sea_orm(string_value = "lecture")]
    Lecture,
    #[sea_orm(string_value = "assignment")]
    Assignment,
    #[sea_orm(string_value = "tutorial")]
    Tutorial,
    #[sea_orm(string_value = "exam")]
    Exam,
    #[sea_orm(string_value = "reference")]
    Reference,
}

impl NoteType {
    /// Wire representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Assignment => "assignment",
            Self::Tutorial => "tutorial",
            Self::Exam => "exam",
            Self::Reference => "reference",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning subject
    #[sea_orm(indexed)]
    pub subject_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Inline text content, may be empty when the note is file-only
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Storage key of the attached file, relative to the media root
    #[sea_orm(nullable)]
    pub file_path: Option<String>,

    /// Original filename of the attached file
    #[sea_orm(nullable)]
    pub file_name: Option<String>,

    /// Storage key of the thumbnail image
    #[sea_orm(nullable)]
    pub thumbnail: Option<String>,

    /// Comma-separated tags
    pub tags: String,

    pub chapter: String,

    pub note_type: NoteType,

    /// Download counter, only ever moves up
    #[sea_orm(default_value = 0)]
    pub downloads: i64,

    #[sea_orm(default_value = false, indexed)]
    pub is_featured: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::rating::Entity")]
    Rating,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rating.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
