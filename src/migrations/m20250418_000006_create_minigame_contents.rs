//! Migration: Create minigame_contents table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MinigameContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MinigameContents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MinigameContents::MinigameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MinigameContents::Question).text().not_null())
                    .col(
                        ColumnDef::new(MinigameContents::CorrectAnswer)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MinigameContents::Option1).string().not_null())
                    .col(ColumnDef::new(MinigameContents::Option2).string().not_null())
                    .col(ColumnDef::new(MinigameContents::Option3).string().not_null())
                    .col(ColumnDef::new(MinigameContents::Option4).string().not_null())
                    .col(
                        ColumnDef::new(MinigameContents::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MinigameContents::Timer)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(MinigameContents::PageNumber).integer().null())
                    .col(ColumnDef::new(MinigameContents::AccountId).big_integer().null())
                    .col(
                        ColumnDef::new(MinigameContents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MinigameContents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MinigameContents::Table, MinigameContents::MinigameId)
                            .to(Minigames::Table, Minigames::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MinigameContents::Table, MinigameContents::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_minigame_contents_minigame_id")
                    .table(MinigameContents::Table)
                    .col(MinigameContents::MinigameId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(MinigameContents::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum MinigameContents {
    Table,
    Id,
    #[iden = "minigame_id"]
    MinigameId,
    Question,
    #[iden = "correct_answer"]
    CorrectAnswer,
    #[iden = "option_1"]
    Option1,
    #[iden = "option_2"]
    Option2,
    #[iden = "option_3"]
    Option3,
    #[iden = "option_4"]
    Option4,
    Points,
    Timer,
    #[iden = "page_number"]
    PageNumber,
    #[iden = "account_id"]
    AccountId,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
pub enum Minigames {
    Table,
    Id,
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
}
