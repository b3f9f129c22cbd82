//! Migration: Create books table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Description).text().not_null())
                    .col(
                        ColumnDef::new(Books::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Books::BookType)
                            .string_len(16)
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(Books::FilePath).string().null())
                    .col(ColumnDef::new(Books::AccountId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Books::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Books::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Books::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Books::Table, Books::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_account_id")
                    .table(Books::Table)
                    .col(Books::AccountId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
    Title,
    Description,
    Status,
    #[iden = "book_type"]
    BookType,
    #[iden = "file_path"]
    FilePath,
    #[iden = "account_id"]
    AccountId,
    #[iden = "deleted_at"]
    DeletedAt,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
}
