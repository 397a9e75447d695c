//! Create note table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Note::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Note::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Note::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Note::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Note::Description).text().not_null())
                    .col(ColumnDef::new(Note::Content).text().not_null())
                    .col(ColumnDef::new(Note::FilePath).string_len(255).null())
                    .col(ColumnDef::new(Note::FileName).string_len(255).null())
                    .col(ColumnDef::new(Note::Thumbnail).string_len(255).null())
                    .col(ColumnDef::new(Note::Tags).string_len(200).not_null())
                    .col(ColumnDef::new(Note::Chapter).string_len(100).not_null())
                    .col(ColumnDef::new(Note::NoteType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Note::Downloads)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Note::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Note::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Note::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_subject")
                            .from(Note::Table, Note::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: subject_id (for listing a subject's notes)
        manager
            .create_index(
                Index::create()
                    .name("idx_note_subject_id")
                    .table(Note::Table)
                    .col(Note::SubjectId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_note_created_at")
                    .table(Note::Table)
                    .col(Note::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: is_featured (featured-notes listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_note_is_featured")
                    .table(Note::Table)
                    .col(Note::IsFeatured)
                    .to_owned(),
            )
            .await?;

        // Index: note_type (type filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_note_note_type")
                    .table(Note::Table)
                    .col(Note::NoteType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Note::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
    SubjectId,
    Title,
    Description,
    Content,
    FilePath,
    FileName,
    Thumbnail,
    Tags,
    Chapter,
    NoteType,
    Downloads,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
}
