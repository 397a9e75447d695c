//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_semester_table;
mod m20250601_000002_create_subject_table;
mod m20250601_000003_create_note_table;
mod m20250601_000004_create_comment_table;
mod m20250601_000005_create_rating_table;
mod m20250601_000006_create_feedback_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_semester_table::Migration),
            Box::new(m20250601_000002_create_subject_table::Migration),
            Box::new(m20250601_000003_create_note_table::Migration),
            Box::new(m20250601_000004_create_comment_table::Migration),
            Box::new(m20250601_000005_create_rating_table::Migration),
            Box::new(m20250601_000006_create_feedback_table::Migration),
        ]
    }
}
