use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One multiple-choice question of a minigame
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "minigame_contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub minigame_id: i64,
    pub question: String,
    /// 1-based index of the correct option
    pub correct_answer: i32,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,
    pub points: i32,
    pub timer: f64,
    pub page_number: Option<i32>,
    pub account_id: Option<i64>,
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
        on_delete = "SetNull"
    )]
    Account,
}

impl Related<super::minigame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Minigame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
