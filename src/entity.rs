//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义。

pub mod prelude;

// === 枚举列 ===
pub mod variety;

// === SeaORM 实体（对应数据库表）===
pub mod game_objects;
pub mod level_game_objects;
pub mod level_next_levels;
pub mod levels;
pub mod player_levels_played;
pub mod players;
