mod common;

use common::{memory_state, seed_two_levels};
use debrand_lib::database::catalog::{
    export_catalog, import_catalog, CatalogFile, CatalogGameObject, CatalogLevel,
};
use debrand_lib::database::db::backup_database;
use debrand_lib::database::repository::game_objects_repository::GameObjectsRepository;
use debrand_lib::database::repository::levels_repository::LevelsRepository;
use debrand_lib::database::service;
use debrand_lib::entity::variety::Variety;
use debrand_lib::error::GameError;

fn catalog_level(name: &str, objects: &[&str], next: &[&str]) -> CatalogLevel {
    CatalogLevel {
        name: name.to_string(),
        slug: None,
        description: format!("{} description", name),
        button_text: format!("Go to {}", name),
        img_src: String::new(),
        img_attribution: String::new(),
        sidebar: false,
        game_objects: objects.iter().map(|s| s.to_string()).collect(),
        next_levels: next.iter().map(|s| s.to_string()).collect(),
    }
}

fn sample_catalog() -> CatalogFile {
    CatalogFile {
        game_objects: vec![
            CatalogGameObject {
                name: "Billboard".into(),
                slug: None,
                variety: Variety::Advertisement,
                points: 7,
            },
            CatalogGameObject {
                name: "Fire Alarm".into(),
                slug: None,
                variety: Variety::Emergency,
                points: -1,
            },
        ],
        levels: vec![
            // 引用文件中后出现的关卡
            catalog_level("Beginning", &["billboard"], &["street", "alley"]),
            catalog_level("Street", &["billboard", "fire-alarm"], &[]),
            catalog_level("Alley", &[], &["beginning"]),
        ],
    }
}

#[test_log::test(tokio::test)]
async fn imports_levels_objects_and_edges() {
    let state = memory_state().await;
    let db = &state.db;

    let summary = import_catalog(db, &sample_catalog(), "beginning").await.unwrap();
    assert_eq!(summary.objects_created, 2);
    assert_eq!(summary.levels_created, 3);
    assert!(summary.has_entry_level);

    assert_eq!(service::level_points(db, "street").await.unwrap(), 6);

    let beginning = service::get_level_by_slug(db, "beginning").await.unwrap();
    let next: Vec<String> = LevelsRepository::next_levels(db, beginning.id)
        .await
        .unwrap()
        .into_iter()
        .map(|level| level.slug)
        .collect();
    assert_eq!(next, vec!["street".to_string(), "alley".to_string()]);
}

#[test_log::test(tokio::test)]
async fn reimport_updates_in_place() {
    let state = memory_state().await;
    let db = &state.db;
    import_catalog(db, &sample_catalog(), "beginning").await.unwrap();

    let mut catalog = sample_catalog();
    catalog.game_objects[0].points = 1;
    catalog.levels[1].game_objects = vec!["fire-alarm".into()];

    let summary = import_catalog(db, &catalog, "beginning").await.unwrap();
    assert_eq!(summary.objects_created, 0);
    assert_eq!(summary.objects_updated, 2);
    assert_eq!(summary.levels_updated, 3);

    assert_eq!(GameObjectsRepository::count(db).await.unwrap(), 2);
    assert_eq!(service::level_points(db, "beginning").await.unwrap(), 1);
    assert_eq!(service::level_points(db, "street").await.unwrap(), -1);
}

#[test_log::test(tokio::test)]
async fn dangling_reference_rolls_back() {
    let state = memory_state().await;
    let db = &state.db;

    let mut catalog = sample_catalog();
    catalog.levels[2].next_levels.push("nowhere".into());

    let err = import_catalog(db, &catalog, "beginning").await.unwrap_err();
    assert!(matches!(err, GameError::InvalidCatalog(_)), "{:?}", err);

    assert_eq!(LevelsRepository::count(db).await.unwrap(), 0);
    assert_eq!(GameObjectsRepository::count(db).await.unwrap(), 0);
}

#[test_log::test(tokio::test)]
async fn reports_missing_entry_level() {
    let state = memory_state().await;
    let db = &state.db;

    let catalog = CatalogFile {
        game_objects: Vec::new(),
        levels: vec![catalog_level("Street", &[], &[])],
    };
    let summary = import_catalog(db, &catalog, "beginning").await.unwrap();
    assert!(!summary.has_entry_level);
}

#[test_log::test(tokio::test)]
async fn export_survives_a_file_round_trip() {
    let state = memory_state().await;
    import_catalog(&state.db, &sample_catalog(), "beginning").await.unwrap();

    let exported = export_catalog(&state.db).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    exported.save(&path).unwrap();

    let loaded = CatalogFile::load(&path).unwrap();
    assert_eq!(loaded, exported);

    let other = memory_state().await;
    import_catalog(&other.db, &loaded, "beginning").await.unwrap();
    assert_eq!(export_catalog(&other.db).await.unwrap(), exported);
}

#[test_log::test(tokio::test)]
async fn renamed_levels_keep_their_slug_through_export() {
    let state = memory_state().await;
    let db = &state.db;
    common::level(db, "Beginning").await;
    common::level(db, "Old Town").await;
    service::link_levels(db, "beginning", "old-town").await.unwrap();
    service::update_level(
        db,
        "old-town",
        debrand_lib::database::dto::UpdateLevelData {
            name: Some("New Town".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let exported = export_catalog(db).await.unwrap();
    let town = &exported.levels[1];
    assert_eq!(town.name, "New Town");
    assert_eq!(town.slug.as_deref(), Some("old-town"));
    assert_eq!(exported.levels[0].next_levels, vec!["old-town".to_string()]);

    // 导回同一个库：按 slug 更新，不产生重复关卡
    let summary = import_catalog(db, &exported, "beginning").await.unwrap();
    assert_eq!(summary.levels_created, 0);
    assert_eq!(summary.levels_updated, 2);
    assert_eq!(LevelsRepository::count(db).await.unwrap(), 2);

    // 导入空库：保留旧 slug，跳转边可以解析
    let fresh = memory_state().await;
    import_catalog(&fresh.db, &exported, "beginning").await.unwrap();
    let restored = service::get_level_by_slug(&fresh.db, "old-town").await.unwrap();
    assert_eq!(restored.name, "New Town");
    assert_eq!(export_catalog(&fresh.db).await.unwrap(), exported);
}

#[test_log::test(tokio::test)]
async fn hand_written_catalog_accepts_variety_codes() {
    let state = memory_state().await;
    let catalog: CatalogFile = serde_json::from_str(
        r#"{
            "game_objects": [
                {"name": "Dog Poop", "variety": "P", "points": -3},
                {"name": "Siren", "variety": "emergency", "points": 2}
            ],
            "levels": [{
                "name": "Beginning",
                "description": "A sidewalk.",
                "button_text": "Start",
                "game_objects": ["dog-poop", "siren"]
            }]
        }"#,
    )
    .unwrap();

    import_catalog(&state.db, &catalog, "beginning").await.unwrap();
    let poop = service::get_game_object_by_slug(&state.db, "dog-poop").await.unwrap();
    assert_eq!(poop.variety, Variety::Poop);
    assert_eq!(service::level_points(&state.db, "beginning").await.unwrap(), -1);
}

#[test_log::test(tokio::test)]
async fn backs_up_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let url = debrand_lib::database::db::sqlite_url_for(&dir.path().join("debrand.db")).unwrap();
    let db = debrand_lib::database::db::connect_and_migrate(&url).await.unwrap();
    seed_two_levels(&db).await;

    let backup_dir = dir.path().join("backups");
    let path = backup_database(&db, Some(&backup_dir)).await.unwrap();

    assert!(path.exists());
    assert!(path.starts_with(&backup_dir));
    let file_name = path.file_name().unwrap().to_string_lossy();
    assert!(file_name.starts_with("debrand_"));
}

#[test_log::test(tokio::test)]
async fn backup_into_a_file_path_fails_with_database_error() {
    let state = memory_state().await;
    let dir = tempfile::tempdir().unwrap();
    // 目标“目录”其实是一个普通文件
    let not_a_dir = dir.path().join("occupied");
    std::fs::write(&not_a_dir, b"x").unwrap();

    let err = backup_database(&state.db, Some(&not_a_dir)).await.unwrap_err();
    assert!(matches!(err, GameError::Database(_)), "{:?}", err);
}
