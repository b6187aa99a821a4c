//! 基线迁移：内容目录
//!
//! 创建管理员编写的内容表：
//! - game_objects：关卡中出现的计分物件
//! - levels：关卡（剧情场景）
//! - level_game_objects：关卡与物件的多对多关联
//! - level_next_levels：关卡之间的有向跳转（允许成环）

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{
    ConnectionTrait, DatabaseBackend, Statement, TransactionTrait,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 已存在则视为旧数据库，直接跳过
        if manager.has_table("levels").await? {
            return Ok(());
        }

        let conn = manager.get_connection();
        let txn = conn.begin().await?;

        create_catalog_schema(&txn).await?;
        create_catalog_indexes(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for table in [
            "level_next_levels",
            "level_game_objects",
            "levels",
            "game_objects",
        ] {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(r#"DROP TABLE IF EXISTS "{}""#, table),
            ))
            .await?;
        }
        Ok(())
    }
}

async fn create_catalog_schema<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    // 1. 计分物件表，variety 以两位代码存储
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "game_objects" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "name" VARCHAR(96) NOT NULL,
            "slug" VARCHAR(50) NOT NULL UNIQUE,
            "variety" VARCHAR(2) NOT NULL,
            "points" INTEGER NOT NULL
        )"#,
    ))
    .await?;

    // 2. 关卡表
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "levels" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "name" VARCHAR(96) NOT NULL,
            "slug" VARCHAR(50) NOT NULL UNIQUE,
            "description" TEXT NOT NULL,
            "button_text" VARCHAR(60) NOT NULL,
            "img_src" VARCHAR(64) NOT NULL DEFAULT '',
            "img_attribution" VARCHAR(96) NOT NULL DEFAULT '',
            "sidebar" BOOLEAN NOT NULL DEFAULT 0
        )"#,
    ))
    .await?;

    // 3. 关卡-物件关联（集合语义，联合主键去重）
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "level_game_objects" (
            "level_id" INTEGER NOT NULL,
            "game_object_id" INTEGER NOT NULL,
            PRIMARY KEY("level_id", "game_object_id"),
            FOREIGN KEY("level_id") REFERENCES "levels"("id") ON DELETE CASCADE,
            FOREIGN KEY("game_object_id") REFERENCES "game_objects"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    // 4. 关卡跳转边，自增 id 用于保持插入顺序
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "level_next_levels" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "from_level_id" INTEGER NOT NULL,
            "to_level_id" INTEGER NOT NULL,
            FOREIGN KEY("from_level_id") REFERENCES "levels"("id") ON DELETE CASCADE,
            FOREIGN KEY("to_level_id") REFERENCES "levels"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    Ok(())
}

async fn create_catalog_indexes<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let indexes = [
        r#"CREATE UNIQUE INDEX "idx_level_next_levels_edge" ON "level_next_levels" ("from_level_id", "to_level_id")"#,
        r#"CREATE INDEX "idx_level_game_objects_object" ON "level_game_objects" ("game_object_id")"#,
    ];

    for sql in indexes {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?;
    }

    Ok(())
}
