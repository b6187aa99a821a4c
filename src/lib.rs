pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod game;
pub mod routes;
pub mod terminal;
pub mod utils;

use config::GameConfig;
use database::db::connect_and_migrate;
use error::Result;
use routes::AppState;

/// 连接数据库、执行迁移并构造共享状态
pub async fn init_state(config: GameConfig) -> Result<AppState> {
    let database_url = config.resolve_database_url()?;
    let db = connect_and_migrate(&database_url).await?;
    log::info!("数据库已就绪");

    Ok(AppState::new(db, config))
}
