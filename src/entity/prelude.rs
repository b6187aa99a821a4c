//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::game_objects::Entity as GameObjects;
pub use super::level_game_objects::Entity as LevelGameObjects;
pub use super::level_next_levels::Entity as LevelNextLevels;
pub use super::levels::Entity as Levels;
pub use super::player_levels_played::Entity as PlayerLevelsPlayed;
pub use super::players::Entity as Players;

pub use super::variety::Variety;
