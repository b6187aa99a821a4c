use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "level_game_objects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub level_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_object_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::levels::Entity",
        from = "Column::LevelId",
        to = "super::levels::Column::Id",
        on_delete = "Cascade"
    )]
    Levels,
    #[sea_orm(
        belongs_to = "super::game_objects::Entity",
        from = "Column::GameObjectId",
        to = "super::game_objects::Column::Id",
        on_delete = "Cascade"
    )]
    GameObjects,
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Levels.def()
    }
}

impl Related<super::game_objects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameObjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
