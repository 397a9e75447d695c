//! Create comment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comment::NoteId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Comment::AuthorName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comment::AuthorEmail)
                            .string_len(254)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comment::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_note")
                            .from(Comment::Table, Comment::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: note_id (for listing comments on a note)
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_note_id")
                    .table(Comment::Table)
                    .col(Comment::NoteId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_created_at")
                    .table(Comment::Table)
                    .col(Comment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
    NoteId,
    AuthorName,
    AuthorEmail,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
}
