//! Create rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::NoteId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Rating::AuthorName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rating::AuthorEmail)
                            .string_len(254)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rating::Score).integer().not_null())
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_note")
                            .from(Rating::Table, Rating::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (note_id, author_email) - one rating per reader per note
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_note_email")
                    .table(Rating::Table)
                    .col(Rating::NoteId)
                    .col(Rating::AuthorEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: note_id (for listing ratings on a note)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_note_id")
                    .table(Rating::Table)
                    .col(Rating::NoteId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rating {
    Table,
    Id,
    NoteId,
    AuthorName,
    AuthorEmail,
    Score,
    CreatedAt,
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
}
