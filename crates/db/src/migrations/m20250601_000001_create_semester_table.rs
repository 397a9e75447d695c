//! Create semester table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Semester::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semester::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semester::Number).integer().not_null())
                    .col(ColumnDef::new(Semester::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Semester::Description).text().not_null())
                    .col(
                        ColumnDef::new(Semester::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Semester::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: number - one row per semester number
        manager
            .create_index(
                Index::create()
                    .name("idx_semester_number")
                    .table(Semester::Table)
                    .col(Semester::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Semester::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Semester {
    Table,
    Id,
    Number,
    Name,
    Description,
    IsActive,
    CreatedAt,
}
