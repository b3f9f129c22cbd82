//! Migration: Create minigame_histories table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MinigameHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MinigameHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::MinigameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::TotalScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::CorrectCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::IncorrectCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MinigameHistories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MinigameHistories::Table, MinigameHistories::MinigameId)
                            .to(Minigames::Table, Minigames::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MinigameHistories::Table, MinigameHistories::AccountId)
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
                    .name("idx_minigame_histories_minigame_id")
                    .table(MinigameHistories::Table)
                    .col(MinigameHistories::MinigameId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_minigame_histories_account_id")
                    .table(MinigameHistories::Table)
                    .col(MinigameHistories::AccountId)
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
                    .table(MinigameHistories::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum MinigameHistories {
    Table,
    Id,
    #[iden = "minigame_id"]
    MinigameId,
    #[iden = "account_id"]
    AccountId,
    #[iden = "total_score"]
    TotalScore,
    #[iden = "correct_count"]
    CorrectCount,
    #[iden = "incorrect_count"]
    IncorrectCount,
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
