//! 玩家实体
//!
//! 记录玩家的游玩进度：访问过的关卡、缓存分数和是否通关。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    /// 由 levels_played 推导出的缓存分数
    pub score: i64,
    pub completed: bool,

    // === 时间戳 ===
    pub created_at: Option<i32>,
    pub updated_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::player_levels_played::Entity")]
    PlayerLevelsPlayed,
}

impl Related<super::player_levels_played::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerLevelsPlayed.def()
    }
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef {
        super::player_levels_played::Relation::Levels.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::player_levels_played::Relation::Players.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
