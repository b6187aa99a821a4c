#![allow(dead_code)]

use debrand_lib::config::GameConfig;
use debrand_lib::database::db::connect_and_migrate;
use debrand_lib::database::dto::{InsertGameObjectData, InsertLevelData, PlayerForm};
use debrand_lib::database::service;
use debrand_lib::entity::variety::Variety;
use debrand_lib::entity::{game_objects, levels, players};
use debrand_lib::routes::AppState;
use sea_orm::DatabaseConnection;

pub const MEMORY_URL: &str = "sqlite::memory:";

/// 每个测试独立的内存数据库
pub async fn memory_state() -> AppState {
    let db = connect_and_migrate(MEMORY_URL).await.expect("迁移内存数据库");
    let config = GameConfig {
        database_url: Some(MEMORY_URL.to_string()),
        ..Default::default()
    };
    AppState::new(db, config)
}

pub async fn object(
    db: &DatabaseConnection,
    name: &str,
    variety: Variety,
    points: i32,
) -> game_objects::Model {
    service::create_game_object(
        db,
        InsertGameObjectData {
            name: name.to_string(),
            variety,
            points,
            slug: None,
        },
    )
    .await
    .expect("创建物件")
}

pub async fn level(db: &DatabaseConnection, name: &str) -> levels::Model {
    service::create_level(
        db,
        InsertLevelData {
            name: name.to_string(),
            description: format!("You are in {}.", name),
            button_text: format!("Go to {}", name),
            ..Default::default()
        },
    )
    .await
    .expect("创建关卡")
}

pub async fn player(db: &DatabaseConnection, name: &str) -> players::Model {
    service::create_player(
        db,
        PlayerForm {
            name: name.to_string(),
        },
    )
    .await
    .expect("创建玩家")
}

/// beginning（10 点）与 forest（5 点），beginning -> forest
pub async fn seed_two_levels(db: &DatabaseConnection) {
    object(db, "Billboard", Variety::Advertisement, 7).await;
    object(db, "Logo", Variety::Branding, 3).await;
    object(db, "Squirrel", Variety::Life, 5).await;

    level(db, "Beginning").await;
    level(db, "Forest").await;

    service::add_game_object_to_level(db, "beginning", "billboard")
        .await
        .unwrap();
    service::add_game_object_to_level(db, "beginning", "logo")
        .await
        .unwrap();
    service::add_game_object_to_level(db, "forest", "squirrel")
        .await
        .unwrap();
    service::link_levels(db, "beginning", "forest").await.unwrap();
}
