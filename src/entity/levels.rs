//! 关卡实体
//!
//! 一个关卡即一个剧情场景，包含若干计分物件和指向后续关卡的有向边。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    /// Markdown 正文
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// 作为后续关卡出现时按钮上的文字
    pub button_text: String,
    pub img_src: String,
    pub img_attribution: String,
    pub sidebar: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::level_game_objects::Entity")]
    LevelGameObjects,
    #[sea_orm(has_many = "super::player_levels_played::Entity")]
    PlayerLevelsPlayed,
}

impl Related<super::level_game_objects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LevelGameObjects.def()
    }
}

impl Related<super::player_levels_played::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerLevelsPlayed.def()
    }
}

impl Related<super::game_objects::Entity> for Entity {
    fn to() -> RelationDef {
        super::level_game_objects::Relation::GameObjects.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::level_game_objects::Relation::Levels.def().rev())
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        super::player_levels_played::Relation::Players.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::player_levels_played::Relation::Levels.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
