//! Create subject table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subject::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subject::SemesterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subject::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Subject::Code).string_len(20).not_null())
                    .col(ColumnDef::new(Subject::Description).text().not_null())
                    .col(
                        ColumnDef::new(Subject::Credits)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(ColumnDef::new(Subject::Thumbnail).string_len(255).null())
                    .col(
                        ColumnDef::new(Subject::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Subject::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_semester")
                            .from(Subject::Table, Subject::SemesterId)
                            .to(Semester::Table, Semester::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: code - one subject per course code
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_code")
                    .table(Subject::Table)
                    .col(Subject::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: semester_id (for listing a semester's subjects)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_semester_id")
                    .table(Subject::Table)
                    .col(Subject::SemesterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
    SemesterId,
    Name,
    Code,
    Description,
    Credits,
    Thumbnail,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Semester {
    Table,
    Id,
}
