//! Migration: Create book_contents table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookContents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookContents::BookId).big_integer().not_null())
                    .col(ColumnDef::new(BookContents::Content).text().not_null())
                    .col(ColumnDef::new(BookContents::Title).string().null())
                    .col(
                        ColumnDef::new(BookContents::PageNumber)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookContents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookContents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BookContents::Table, BookContents::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_book_contents_book_id")
                    .table(BookContents::Table)
                    .col(BookContents::BookId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookContents::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookContents {
    Table,
    Id,
    #[iden = "book_id"]
    BookId,
    Content,
    Title,
    #[iden = "page_number"]
    PageNumber,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
}
