//! Subject entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning semester
    #[sea_orm(indexed)]
    pub semester_id: String,

    pub name: String,

    /// Course code, unique across all semesters
    #[sea_orm(unique)]
    pub code: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(default_value = 3)]
    pub credits: i32,

    /// Storage key of the thumbnail image
    #[sea_orm(nullable)]
    pub thumbnail: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semester::Entity",
        from = "Column::SemesterId",
        to = "super::semester::Column::Id",
        on_delete = "Cascade"
    )]
    Semester,

    #[sea_orm(has_many = "super::note::Entity")]
    Note,
}

impl Related<super::semester::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
