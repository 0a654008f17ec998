//! Content blocks table.
//!
//! Built with the schema builder so the same migration runs on SQLite and
//! PostgreSQL.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentBlocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentBlocks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentBlocks::Type).string().not_null())
                    .col(ColumnDef::new(ContentBlocks::Title).text().not_null())
                    .col(ColumnDef::new(ContentBlocks::Content).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ContentBlocks::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ContentBlocks {
    Table,
    Id,
    Type,
    Title,
    Content,
}
