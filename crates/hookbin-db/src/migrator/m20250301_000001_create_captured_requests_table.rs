//! Migration to create captured_requests table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CapturedRequest::Table)
                    .if_not_exists()
                    // AUTOINCREMENT on SQLite: ids of swept rows are never handed out again
                    .col(
                        ColumnDef::new(CapturedRequest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CapturedRequest::Uid).string_len(14).null())
                    .col(ColumnDef::new(CapturedRequest::Method).string().not_null())
                    .col(ColumnDef::new(CapturedRequest::Url).text().not_null())
                    .col(ColumnDef::new(CapturedRequest::Headers).text().not_null())
                    .col(ColumnDef::new(CapturedRequest::Body).text().null())
                    .col(ColumnDef::new(CapturedRequest::Query).text().null())
                    .col(ColumnDef::new(CapturedRequest::Ip).string().null())
                    .col(
                        ColumnDef::new(CapturedRequest::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Window reads and the retention sweep both range over created_at
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_captured_requests_created_at")
                    .table(CapturedRequest::Table)
                    .col(CapturedRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_captured_requests_uid")
                    .table(CapturedRequest::Table)
                    .col(CapturedRequest::Uid)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CapturedRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CapturedRequest {
    #[sea_orm(iden = "captured_requests")]
    Table,
    Id,
    Uid,
    Method,
    Url,
    Headers,
    Body,
    Query,
    Ip,
    CreatedAt,
}
