//! 运行配置

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 新玩家进入游戏时请求的第一个关卡
pub const ENTRY_LEVEL_SLUG: &str = "beginning";

/// 游戏配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// 入口关卡 slug，内容目录中必须存在此关卡游戏才能开始
    pub entry_slug: String,
    /// 数据库连接字符串，None 时使用数据目录下的 debrand.db
    pub database_url: Option<String>,
    /// 初始日志级别
    pub log_level: String,
    /// 额外写入的日志文件
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            entry_slug: ENTRY_LEVEL_SLUG.to_string(),
            database_url: None,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl GameConfig {
    /// 解析最终使用的数据库连接字符串
    pub fn resolve_database_url(&self) -> Result<String, sea_orm::DbErr> {
        match &self.database_url {
            Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
            _ => crate::database::db::default_database_url(),
        }
    }
}
