//! 基线迁移：玩家进度
//!
//! - players：角色与缓存分数
//! - player_levels_played：玩家访问过的关卡（集合语义，重复访问不重复计分）

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{
    ConnectionTrait, DatabaseBackend, Statement, TransactionTrait,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_table("players").await? {
            return Ok(());
        }

        let conn = manager.get_connection();
        let txn = conn.begin().await?;

        txn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"CREATE TABLE "players" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "name" VARCHAR(96) NOT NULL,
                "slug" VARCHAR(50) NOT NULL UNIQUE,
                "score" BIGINT NOT NULL DEFAULT 0,
                "completed" BOOLEAN NOT NULL DEFAULT 0
            )"#,
        ))
        .await?;

        txn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"CREATE TABLE "player_levels_played" (
                "player_id" INTEGER NOT NULL,
                "level_id" INTEGER NOT NULL,
                PRIMARY KEY("player_id", "level_id"),
                FOREIGN KEY("player_id") REFERENCES "players"("id") ON DELETE CASCADE,
                FOREIGN KEY("level_id") REFERENCES "levels"("id") ON DELETE CASCADE
            )"#,
        ))
        .await?;

        // 排行榜按完成状态筛选
        txn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"CREATE INDEX "idx_players_completed" ON "players" ("completed")"#,
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for table in ["player_levels_played", "players"] {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(r#"DROP TABLE IF EXISTS "{}""#, table),
            ))
            .await?;
        }
        Ok(())
    }
}
