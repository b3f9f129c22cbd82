//! Migration: Create minigames table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Minigames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Minigames::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Minigames::Title).string().not_null())
                    .col(
                        ColumnDef::new(Minigames::DefaultTimer)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Minigames::DefaultPoints)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Minigames::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Minigames::AccountId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Minigames::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Minigames::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Minigames::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Minigames::Table, Minigames::AccountId)
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
                    .name("idx_minigames_starts_at")
                    .table(Minigames::Table)
                    .col(Minigames::StartsAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Minigames::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Minigames {
    Table,
    Id,
    Title,
    #[iden = "default_timer"]
    DefaultTimer,
    #[iden = "default_points"]
    DefaultPoints,
    #[iden = "starts_at"]
    StartsAt,
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
