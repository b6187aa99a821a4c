//! 计分物件实体
//!
//! 玩家在关卡中遇到的东西。分数由所访问关卡中的物件决定。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::variety::Variety;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_objects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub variety: Variety,
    pub points: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::level_game_objects::Entity")]
    LevelGameObjects,
}

impl Related<super::level_game_objects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LevelGameObjects.def()
    }
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef {
        super::level_game_objects::Relation::Levels.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::level_game_objects::Relation::GameObjects.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
