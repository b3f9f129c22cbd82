use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One recorded play-through of a minigame
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "minigame_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub minigame_id: i64,
    pub account_id: i64,
    pub total_score: i32,
    pub correct_count: i32,
    pub incorrect_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::minigame::Entity",
        from = "Column::MinigameId",
        to = "super::minigame::Column::Id",
        on_delete = "Cascade"
    )]
    Minigame,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::minigame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Minigame.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
