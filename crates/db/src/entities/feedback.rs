//! Feedback entity (standalone site feedback).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of feedback a visitor can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    #[sea_orm(string_value = "suggestion")]
    Suggestion,
    #[sea_orm(string_value = "bug")]
    Bug,
    #[sea_orm(string_value = "general")]
    General,
}

impl FeedbackType {
    /// Wire representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Bug => "bug",
            Self::General => "general",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub email: String,

    pub feedback_type: FeedbackType,

    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
