//! 服务层
//!
//! 包装仓库操作：校验输入，按 slug 解析记录，并把存储错误归类为 `GameError`。

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::database::dto::{
    InsertGameObjectData, InsertLevelData, PlayerForm, UpdateGameObjectData, UpdateLevelData,
};
use crate::database::repository::{
    game_objects_repository::GameObjectsRepository,
    levels_repository::LevelsRepository,
    players_repository::{LeaderboardOrder, PlayersRepository},
};
use crate::entity::{game_objects, levels, players};
use crate::error::{GameError, Result};
use crate::game::scoring::SidebarData;
use crate::game::slug::slugify;

/// slug 列的长度上限
pub const SLUG_MAX_LEN: usize = 50;

/// 名称必须能推导出非空且不超长的 slug
fn checked_slug(name: &str) -> Result<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(GameError::InvalidName(name.to_string()));
    }
    if slug.chars().count() > SLUG_MAX_LEN {
        return Err(GameError::SlugTooLong {
            slug,
            max: SLUG_MAX_LEN,
        });
    }
    Ok(slug)
}

/// 显式给出的 slug 必须已是规范形式；未给出时由名称推导
fn resolve_slug(name: &str, explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(slug) => {
            let normalized = checked_slug(slug)?;
            if normalized != slug {
                return Err(GameError::InvalidName(slug.to_string()));
            }
            Ok(normalized)
        }
        None => checked_slug(name),
    }
}

// ==================== 玩家 ====================

/// 创建角色
///
/// slug 冲突不做自动去重，直接返回 `SlugTaken`
pub async fn create_player(db: &DatabaseConnection, form: PlayerForm) -> Result<players::Model> {
    let name = form.name.trim().to_string();
    let slug = checked_slug(&name)?;

    let player = PlayersRepository::create(db, name)
        .await
        .map_err(|e| GameError::from_write(e, &slug))?;

    log::info!("创建玩家 {} (id={}, slug={})", player.name, player.id, player.slug);
    Ok(player)
}

/// 根据 ID 查询玩家
pub async fn find_player(db: &DatabaseConnection, id: i32) -> Result<Option<players::Model>> {
    Ok(PlayersRepository::find_by_id(db, id).await?)
}

/// 根据 slug 获取玩家，不存在时报错
pub async fn get_player_by_slug<C>(db: &C, slug: &str) -> Result<players::Model>
where
    C: ConnectionTrait,
{
    PlayersRepository::find_by_slug(db, slug)
        .await?
        .ok_or_else(|| GameError::not_found("玩家", slug))
}

/// 排行榜：所有已通关的玩家
pub async fn completed_players(
    db: &DatabaseConnection,
    order: LeaderboardOrder,
) -> Result<Vec<players::Model>> {
    Ok(PlayersRepository::find_completed(db, order).await?)
}

/// 侧栏数据
pub async fn sidebar_data<C>(db: &C, player_id: i32) -> Result<SidebarData>
where
    C: ConnectionTrait,
{
    Ok(PlayersRepository::prepare_sidebar_data(db, player_id).await?)
}

/// 按当前名称重新生成玩家 slug
pub async fn reslug_player(db: &DatabaseConnection, slug: &str) -> Result<players::Model> {
    let player = get_player_by_slug(db, slug).await?;
    let new_slug = checked_slug(&player.name)?;

    let updated = PlayersRepository::reslug(db, player.id)
        .await
        .map_err(|e| GameError::from_write(e, &new_slug))?;
    log::info!("玩家 slug 已更新: {} -> {}", slug, updated.slug);
    Ok(updated)
}

// ==================== 物件 ====================

/// 创建计分物件
pub async fn create_game_object<C>(
    db: &C,
    data: InsertGameObjectData,
) -> Result<game_objects::Model>
where
    C: ConnectionTrait,
{
    let mut data = data;
    let slug = resolve_slug(&data.name, data.slug.as_deref())?;
    data.slug = Some(slug.clone());

    let game_object = GameObjectsRepository::create(db, data)
        .await
        .map_err(|e| GameError::from_write(e, &slug))?;
    log::debug!("创建物件 {} ({})", game_object.slug, game_object.variety);
    Ok(game_object)
}

/// 根据 slug 获取物件，不存在时报错
pub async fn get_game_object_by_slug<C>(db: &C, slug: &str) -> Result<game_objects::Model>
where
    C: ConnectionTrait,
{
    GameObjectsRepository::find_by_slug(db, slug)
        .await?
        .ok_or_else(|| GameError::not_found("物件", slug))
}

/// 按 slug 更新物件
pub async fn update_game_object<C>(
    db: &C,
    slug: &str,
    updates: UpdateGameObjectData,
) -> Result<game_objects::Model>
where
    C: ConnectionTrait,
{
    let existing = get_game_object_by_slug(db, slug).await?;
    Ok(GameObjectsRepository::update(db, existing.id, updates).await?)
}

/// 按 slug 删除物件
pub async fn delete_game_object(db: &DatabaseConnection, slug: &str) -> Result<u64> {
    let existing = get_game_object_by_slug(db, slug).await?;
    let result = GameObjectsRepository::delete(db, existing.id).await?;
    Ok(result.rows_affected)
}

/// 按当前名称重新生成物件 slug
pub async fn reslug_game_object(db: &DatabaseConnection, slug: &str) -> Result<game_objects::Model> {
    let existing = get_game_object_by_slug(db, slug).await?;
    let new_slug = checked_slug(&existing.name)?;

    let updated = GameObjectsRepository::reslug(db, existing.id)
        .await
        .map_err(|e| GameError::from_write(e, &new_slug))?;
    log::info!("物件 slug 已更新: {} -> {}", slug, updated.slug);
    Ok(updated)
}

// ==================== 关卡 ====================

/// 创建关卡
pub async fn create_level<C>(db: &C, data: InsertLevelData) -> Result<levels::Model>
where
    C: ConnectionTrait,
{
    let mut data = data;
    let slug = resolve_slug(&data.name, data.slug.as_deref())?;
    data.slug = Some(slug.clone());

    let level = LevelsRepository::create(db, data)
        .await
        .map_err(|e| GameError::from_write(e, &slug))?;
    log::debug!("创建关卡 {}", level.slug);
    Ok(level)
}

/// 根据 slug 获取关卡，不存在时报错
pub async fn get_level_by_slug<C>(db: &C, slug: &str) -> Result<levels::Model>
where
    C: ConnectionTrait,
{
    LevelsRepository::find_by_slug(db, slug)
        .await?
        .ok_or_else(|| GameError::not_found("关卡", slug))
}

/// 按 slug 更新关卡
pub async fn update_level<C>(db: &C, slug: &str, updates: UpdateLevelData) -> Result<levels::Model>
where
    C: ConnectionTrait,
{
    let existing = get_level_by_slug(db, slug).await?;
    Ok(LevelsRepository::update(db, existing.id, updates).await?)
}

/// 按 slug 删除关卡
pub async fn delete_level(db: &DatabaseConnection, slug: &str) -> Result<u64> {
    let existing = get_level_by_slug(db, slug).await?;
    let result = LevelsRepository::delete(db, existing.id).await?;
    Ok(result.rows_affected)
}

/// 按当前名称重新生成关卡 slug
pub async fn reslug_level(db: &DatabaseConnection, slug: &str) -> Result<levels::Model> {
    let existing = get_level_by_slug(db, slug).await?;
    let new_slug = checked_slug(&existing.name)?;

    let updated = LevelsRepository::reslug(db, existing.id)
        .await
        .map_err(|e| GameError::from_write(e, &new_slug))?;
    log::info!("关卡 slug 已更新: {} -> {}", slug, updated.slug);
    Ok(updated)
}

/// 关卡点数
pub async fn level_points(db: &DatabaseConnection, slug: &str) -> Result<i64> {
    let level = get_level_by_slug(db, slug).await?;
    Ok(LevelsRepository::level_points(db, level.id).await?)
}

/// 将物件放入关卡
pub async fn add_game_object_to_level(
    db: &DatabaseConnection,
    level_slug: &str,
    object_slug: &str,
) -> Result<bool> {
    let level = get_level_by_slug(db, level_slug).await?;
    let game_object = get_game_object_by_slug(db, object_slug).await?;
    Ok(LevelsRepository::add_game_object(db, level.id, game_object.id).await?)
}

/// 从关卡中移除物件
pub async fn remove_game_object_from_level(
    db: &DatabaseConnection,
    level_slug: &str,
    object_slug: &str,
) -> Result<u64> {
    let level = get_level_by_slug(db, level_slug).await?;
    let game_object = get_game_object_by_slug(db, object_slug).await?;
    let result = LevelsRepository::remove_game_object(db, level.id, game_object.id).await?;
    Ok(result.rows_affected)
}

/// 添加跳转边 from -> to
pub async fn link_levels(db: &DatabaseConnection, from_slug: &str, to_slug: &str) -> Result<bool> {
    let from = get_level_by_slug(db, from_slug).await?;
    let to = get_level_by_slug(db, to_slug).await?;
    Ok(LevelsRepository::add_next_level(db, from.id, to.id).await?)
}

/// 删除跳转边 from -> to
pub async fn unlink_levels(db: &DatabaseConnection, from_slug: &str, to_slug: &str) -> Result<u64> {
    let from = get_level_by_slug(db, from_slug).await?;
    let to = get_level_by_slug(db, to_slug).await?;
    let result = LevelsRepository::remove_next_level(db, from.id, to.id).await?;
    Ok(result.rows_affected)
}

/// 将关卡的物件集合替换为给定 slug 列表
pub async fn set_level_game_objects<C>(db: &C, level_slug: &str, object_slugs: &[String]) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let level = get_level_by_slug(db, level_slug).await?;
    let mut ids = Vec::with_capacity(object_slugs.len());
    for slug in object_slugs {
        ids.push(get_game_object_by_slug(db, slug).await?.id);
    }
    Ok(LevelsRepository::set_game_objects(db, level.id, ids).await?)
}

/// 将关卡的后续关卡替换为给定 slug 列表（保持顺序）
pub async fn set_level_next_levels<C>(db: &C, level_slug: &str, next_slugs: &[String]) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let level = get_level_by_slug(db, level_slug).await?;
    let mut ids = Vec::with_capacity(next_slugs.len());
    for slug in next_slugs {
        ids.push(get_level_by_slug(db, slug).await?.id);
    }
    Ok(LevelsRepository::set_next_levels(db, level.id, ids).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_without_slug_characters() {
        assert!(matches!(checked_slug("!!!"), Err(GameError::InvalidName(_))));
        assert_eq!(checked_slug("Amy").unwrap(), "amy");
    }

    #[test]
    fn rejects_slugs_over_the_column_limit() {
        let fits = "a".repeat(SLUG_MAX_LEN);
        assert_eq!(checked_slug(&fits).unwrap(), fits);

        let long = "word ".repeat(11);
        assert!(matches!(
            checked_slug(&long),
            Err(GameError::SlugTooLong { max: SLUG_MAX_LEN, .. })
        ));
    }

    #[test]
    fn explicit_slugs_must_be_normalized() {
        assert_eq!(resolve_slug("New Town", Some("old-town")).unwrap(), "old-town");
        assert_eq!(resolve_slug("New Town", None).unwrap(), "new-town");
        assert!(matches!(
            resolve_slug("New Town", Some("Old Town")),
            Err(GameError::InvalidName(_))
        ));
    }
}
