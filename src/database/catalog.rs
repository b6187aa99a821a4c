//! 内容目录导入/导出
//!
//! 目录文件是 JSON：物件列表和关卡列表，关卡通过 slug 引用物件与后续关卡。
//! 导入在单个事务中进行，按记录的 slug（缺省时由名称推导）做 upsert，并用文件中的列表替换关联。
//! 导出总是写出数据库中的 slug，改名后 slug 不变的记录也能原样导回。

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::database::dto::{
    InsertGameObjectData, InsertLevelData, UpdateGameObjectData, UpdateLevelData,
};
use crate::database::repository::{
    game_objects_repository::GameObjectsRepository, levels_repository::LevelsRepository,
};
use crate::database::service;
use crate::entity::variety::Variety;
use crate::error::{GameError, Result};
use crate::game::slug::slugify;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub game_objects: Vec<CatalogGameObject>,
    #[serde(default)]
    pub levels: Vec<CatalogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGameObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub variety: Variety,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLevel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub description: String,
    pub button_text: String,
    #[serde(default)]
    pub img_src: String,
    #[serde(default)]
    pub img_attribution: String,
    #[serde(default)]
    pub sidebar: bool,
    /// 物件 slug
    #[serde(default)]
    pub game_objects: Vec<String>,
    /// 后续关卡 slug，顺序即选项顺序
    #[serde(default)]
    pub next_levels: Vec<String>,
}

impl CatalogGameObject {
    pub fn record_slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.name))
    }
}

impl CatalogLevel {
    pub fn record_slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.name))
    }
}

/// 导入统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub objects_created: usize,
    pub objects_updated: usize,
    pub levels_created: usize,
    pub levels_updated: usize,
    pub has_entry_level: bool,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// 检查每条记录都有 slug，以及文件内是否有重复 slug
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for obj in &self.game_objects {
            let slug = obj.record_slug();
            if slug.is_empty() {
                return Err(GameError::InvalidName(obj.name.clone()));
            }
            if !seen.insert(slug.clone()) {
                return Err(GameError::InvalidCatalog(format!("物件 slug `{}` 重复", slug)));
            }
        }

        seen.clear();
        for level in &self.levels {
            let slug = level.record_slug();
            if slug.is_empty() {
                return Err(GameError::InvalidName(level.name.clone()));
            }
            if !seen.insert(slug.clone()) {
                return Err(GameError::InvalidCatalog(format!("关卡 slug `{}` 重复", slug)));
            }
        }

        Ok(())
    }
}

fn dangling_reference(level_slug: &str, err: GameError) -> GameError {
    match err {
        GameError::NotFound { entity, key } => GameError::InvalidCatalog(format!(
            "关卡 `{}` 引用了不存在的{} `{}`",
            level_slug, entity, key
        )),
        other => other,
    }
}

/// 导入内容目录
///
/// 任何引用缺失或 slug 冲突都会让整个导入回滚
pub async fn import_catalog(
    db: &DatabaseConnection,
    catalog: &CatalogFile,
    entry_slug: &str,
) -> Result<ImportSummary> {
    catalog.validate()?;

    let txn = db.begin().await?;
    let mut summary = ImportSummary::default();

    // 1. 物件：按 slug upsert
    for obj in &catalog.game_objects {
        let slug = obj.record_slug();
        match GameObjectsRepository::find_by_slug(&txn, &slug).await? {
            Some(existing) => {
                GameObjectsRepository::update(
                    &txn,
                    existing.id,
                    UpdateGameObjectData {
                        name: Some(obj.name.clone()),
                        variety: Some(obj.variety),
                        points: Some(obj.points),
                    },
                )
                .await?;
                summary.objects_updated += 1;
            }
            None => {
                service::create_game_object(
                    &txn,
                    InsertGameObjectData {
                        name: obj.name.clone(),
                        variety: obj.variety,
                        points: obj.points,
                        slug: Some(slug),
                    },
                )
                .await?;
                summary.objects_created += 1;
            }
        }
    }

    // 2. 关卡：按 slug upsert
    for level in &catalog.levels {
        let slug = level.record_slug();
        match LevelsRepository::find_by_slug(&txn, &slug).await? {
            Some(existing) => {
                LevelsRepository::update(
                    &txn,
                    existing.id,
                    UpdateLevelData {
                        name: Some(level.name.clone()),
                        description: Some(level.description.clone()),
                        button_text: Some(level.button_text.clone()),
                        img_src: Some(Some(level.img_src.clone())),
                        img_attribution: Some(Some(level.img_attribution.clone())),
                        sidebar: Some(level.sidebar),
                    },
                )
                .await?;
                summary.levels_updated += 1;
            }
            None => {
                service::create_level(
                    &txn,
                    InsertLevelData {
                        name: level.name.clone(),
                        slug: Some(slug),
                        description: level.description.clone(),
                        button_text: level.button_text.clone(),
                        img_src: level.img_src.clone(),
                        img_attribution: level.img_attribution.clone(),
                        sidebar: level.sidebar,
                    },
                )
                .await?;
                summary.levels_created += 1;
            }
        }
    }

    // 3. 所有关卡都存在之后再连接物件和跳转边
    for level in &catalog.levels {
        let slug = level.record_slug();
        service::set_level_game_objects(&txn, &slug, &level.game_objects)
            .await
            .map_err(|e| dangling_reference(&slug, e))?;
        service::set_level_next_levels(&txn, &slug, &level.next_levels)
            .await
            .map_err(|e| dangling_reference(&slug, e))?;
    }

    summary.has_entry_level = LevelsRepository::find_by_slug(&txn, entry_slug)
        .await?
        .is_some();

    txn.commit().await?;

    if !summary.has_entry_level {
        log::warn!("内容目录中没有入口关卡 `{}`，游戏无法开始", entry_slug);
    }
    log::info!(
        "内容目录导入完成: 物件 +{} ~{}, 关卡 +{} ~{}",
        summary.objects_created,
        summary.objects_updated,
        summary.levels_created,
        summary.levels_updated
    );

    Ok(summary)
}

/// 导出当前内容目录
pub async fn export_catalog(db: &DatabaseConnection) -> Result<CatalogFile> {
    let game_objects = GameObjectsRepository::find_all(db)
        .await?
        .into_iter()
        .map(|obj| CatalogGameObject {
            name: obj.name,
            slug: Some(obj.slug),
            variety: obj.variety,
            points: obj.points,
        })
        .collect();

    let mut levels = Vec::new();
    for level in LevelsRepository::find_all(db).await? {
        let objects = LevelsRepository::game_objects(db, level.id).await?;
        let next_levels = LevelsRepository::next_levels(db, level.id).await?;

        levels.push(CatalogLevel {
            name: level.name,
            slug: Some(level.slug),
            description: level.description,
            button_text: level.button_text,
            img_src: level.img_src,
            img_attribution: level.img_attribution,
            sidebar: level.sidebar,
            game_objects: objects.into_iter().map(|obj| obj.slug).collect(),
            next_levels: next_levels.into_iter().map(|next| next.slug).collect(),
        });
    }

    Ok(CatalogFile {
        game_objects,
        levels,
    })
}
