//! 关卡跳转边
//!
//! 有向、非对称：from -> to 不蕴含 to -> from。自增 id 决定选项顺序。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "level_next_levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub from_level_id: i32,
    pub to_level_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::levels::Entity",
        from = "Column::FromLevelId",
        to = "super::levels::Column::Id",
        on_delete = "Cascade"
    )]
    FromLevel,
    #[sea_orm(
        belongs_to = "super::levels::Entity",
        from = "Column::ToLevelId",
        to = "super::levels::Column::Id",
        on_delete = "Cascade"
    )]
    ToLevel,
}

impl ActiveModelBehavior for ActiveModel {}
