use std::collections::{HashMap, HashSet};

use crate::database::dto::{InsertLevelData, UpdateLevelData};
use crate::entity::prelude::*;
use crate::entity::{game_objects, level_game_objects, level_next_levels, levels};
use crate::game::scoring::total_points;
use crate::game::slug::slugify;
use sea_orm::*;

/// 关卡数据仓库
pub struct LevelsRepository;

impl LevelsRepository {
    // ==================== 关卡 CRUD 操作 ====================

    /// 创建关卡，slug 在首次保存时确定，未显式给出时由 name 推导
    pub async fn create<C>(db: &C, data: InsertLevelData) -> Result<levels::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let level = levels::ActiveModel {
            id: NotSet,
            slug: Set(data.slug.unwrap_or_else(|| slugify(&data.name))),
            name: Set(data.name),
            description: Set(data.description),
            button_text: Set(data.button_text),
            img_src: Set(data.img_src),
            img_attribution: Set(data.img_attribution),
            sidebar: Set(data.sidebar),
        };

        level.insert(db).await
    }

    /// 根据 ID 查询关卡
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<levels::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::find_by_id(id).one(db).await
    }

    /// 根据 slug 查询关卡
    pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<levels::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::find()
            .filter(levels::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    /// 获取所有关卡（按 ID 排序）
    pub async fn find_all<C>(db: &C) -> Result<Vec<levels::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::find().order_by_asc(levels::Column::Id).all(db).await
    }

    /// 更新关卡
    ///
    /// 修改 name 不会改变 slug，外部链接依赖 slug 的稳定性
    pub async fn update<C>(
        db: &C,
        id: i32,
        updates: UpdateLevelData,
    ) -> Result<levels::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let level = levels::ActiveModel {
            id: Set(id),
            name: updates.name.map_or(NotSet, Set),
            description: updates.description.map_or(NotSet, Set),
            button_text: updates.button_text.map_or(NotSet, Set),
            img_src: updates
                .img_src
                .map_or(NotSet, |src| Set(src.unwrap_or_default())),
            img_attribution: updates
                .img_attribution
                .map_or(NotSet, |attr| Set(attr.unwrap_or_default())),
            sidebar: updates.sidebar.map_or(NotSet, Set),
            ..Default::default()
        };

        level.update(db).await
    }

    /// 按当前名称重新生成 slug
    pub async fn reslug<C>(db: &C, id: i32) -> Result<levels::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let existing = Levels::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Level not found".to_string()))?;

        let slug = slugify(&existing.name);
        let mut active: levels::ActiveModel = existing.into();
        active.slug = Set(slug);

        active.update(db).await
    }

    /// 删除关卡（物件关联、跳转边和访问记录级联删除）
    pub async fn delete<C>(db: &C, id: i32) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::delete_by_id(id).exec(db).await
    }

    /// 获取关卡总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::find().count(db).await
    }

    // ==================== 关卡-物件关联操作 ====================

    /// 将物件放入关卡，已存在时不重复添加
    ///
    /// 返回是否新增了关联
    pub async fn add_game_object<C>(
        db: &C,
        level_id: i32,
        game_object_id: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        if Self::has_game_object(db, level_id, game_object_id).await? {
            return Ok(false);
        }

        let link = level_game_objects::ActiveModel {
            level_id: Set(level_id),
            game_object_id: Set(game_object_id),
        };
        LevelGameObjects::insert(link)
            .exec_without_returning(db)
            .await?;

        Ok(true)
    }

    /// 从关卡中移除物件
    pub async fn remove_game_object<C>(
        db: &C,
        level_id: i32,
        game_object_id: i32,
    ) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        LevelGameObjects::delete_many()
            .filter(
                level_game_objects::Column::LevelId
                    .eq(level_id)
                    .and(level_game_objects::Column::GameObjectId.eq(game_object_id)),
            )
            .exec(db)
            .await
    }

    /// 检查物件是否在关卡中
    pub async fn has_game_object<C>(
        db: &C,
        level_id: i32,
        game_object_id: i32,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let count = LevelGameObjects::find()
            .filter(
                level_game_objects::Column::LevelId
                    .eq(level_id)
                    .and(level_game_objects::Column::GameObjectId.eq(game_object_id)),
            )
            .count(db)
            .await?;

        Ok(count > 0)
    }

    /// 获取关卡中的所有物件
    pub async fn game_objects<C>(db: &C, level_id: i32) -> Result<Vec<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::find()
            .inner_join(LevelGameObjects)
            .filter(level_game_objects::Column::LevelId.eq(level_id))
            .order_by_asc(game_objects::Column::Id)
            .all(db)
            .await
    }

    /// 关卡点数：所含物件点数之和，没有物件时为 0
    ///
    /// 不缓存在关卡上，每次按当前内容重新计算
    pub async fn level_points<C>(db: &C, level_id: i32) -> Result<i64, DbErr>
    where
        C: ConnectionTrait,
    {
        let objects = Self::game_objects(db, level_id).await?;
        Ok(total_points(&objects))
    }

    /// 将关卡中的物件完全替换为 game_object_ids（差异更新）
    pub async fn set_game_objects<C>(
        db: &C,
        level_id: i32,
        game_object_ids: Vec<i32>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;

        let current: HashSet<i32> = LevelGameObjects::find()
            .filter(level_game_objects::Column::LevelId.eq(level_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.game_object_id)
            .collect();
        let wanted: HashSet<i32> = game_object_ids.into_iter().collect();

        let to_delete: Vec<i32> = current.difference(&wanted).copied().collect();
        if !to_delete.is_empty() {
            LevelGameObjects::delete_many()
                .filter(
                    level_game_objects::Column::LevelId
                        .eq(level_id)
                        .and(level_game_objects::Column::GameObjectId.is_in(to_delete)),
                )
                .exec(&txn)
                .await?;
        }

        let mut to_insert: Vec<i32> = wanted.difference(&current).copied().collect();
        to_insert.sort_unstable();
        if !to_insert.is_empty() {
            LevelGameObjects::insert_many(to_insert.into_iter().map(|game_object_id| {
                level_game_objects::ActiveModel {
                    level_id: Set(level_id),
                    game_object_id: Set(game_object_id),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    // ==================== 关卡跳转边操作 ====================

    /// 添加一条 from -> to 的跳转边，已存在时不重复添加
    ///
    /// 边是单向的，允许自环和环路
    pub async fn add_next_level<C>(db: &C, from_level_id: i32, to_level_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let exists = LevelNextLevels::find()
            .filter(
                level_next_levels::Column::FromLevelId
                    .eq(from_level_id)
                    .and(level_next_levels::Column::ToLevelId.eq(to_level_id)),
            )
            .count(db)
            .await?
            > 0;
        if exists {
            return Ok(false);
        }

        let edge = level_next_levels::ActiveModel {
            id: NotSet,
            from_level_id: Set(from_level_id),
            to_level_id: Set(to_level_id),
        };
        edge.insert(db).await?;

        Ok(true)
    }

    /// 删除一条跳转边
    pub async fn remove_next_level<C>(
        db: &C,
        from_level_id: i32,
        to_level_id: i32,
    ) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        LevelNextLevels::delete_many()
            .filter(
                level_next_levels::Column::FromLevelId
                    .eq(from_level_id)
                    .and(level_next_levels::Column::ToLevelId.eq(to_level_id)),
            )
            .exec(db)
            .await
    }

    /// 获取关卡的后续关卡，按边的插入顺序
    pub async fn next_levels<C>(db: &C, level_id: i32) -> Result<Vec<levels::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let edges = LevelNextLevels::find()
            .filter(level_next_levels::Column::FromLevelId.eq(level_id))
            .order_by_asc(level_next_levels::Column::Id)
            .all(db)
            .await?;

        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let target_ids: Vec<i32> = edges.iter().map(|edge| edge.to_level_id).collect();
        let mut targets: HashMap<i32, levels::Model> = Levels::find()
            .filter(levels::Column::Id.is_in(target_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|level| (level.id, level))
            .collect();

        // (from, to) 唯一，每个目标只会取出一次
        Ok(edges
            .iter()
            .filter_map(|edge| targets.remove(&edge.to_level_id))
            .collect())
    }

    /// 将关卡的跳转边完全替换为 next_level_ids（差异更新）
    ///
    /// 保留未变动的边（及其顺序），删除多余的边，按给定顺序追加新边
    pub async fn set_next_levels<C>(
        db: &C,
        level_id: i32,
        next_level_ids: Vec<i32>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;

        // 1. 查询现有的边
        let current_edges = LevelNextLevels::find()
            .filter(level_next_levels::Column::FromLevelId.eq(level_id))
            .all(&txn)
            .await?;
        let current: HashSet<i32> = current_edges.iter().map(|edge| edge.to_level_id).collect();
        let wanted: HashSet<i32> = next_level_ids.iter().copied().collect();

        // 2. 删除不再需要的边
        let to_delete: Vec<i32> = current_edges
            .iter()
            .filter(|edge| !wanted.contains(&edge.to_level_id))
            .map(|edge| edge.id)
            .collect();
        if !to_delete.is_empty() {
            LevelNextLevels::delete_many()
                .filter(level_next_levels::Column::Id.is_in(to_delete))
                .exec(&txn)
                .await?;
        }

        // 3. 按给定顺序插入新边（跳过重复）
        let mut seen = HashSet::new();
        let to_insert: Vec<level_next_levels::ActiveModel> = next_level_ids
            .into_iter()
            .filter(|id| !current.contains(id) && seen.insert(*id))
            .map(|to_level_id| level_next_levels::ActiveModel {
                id: NotSet,
                from_level_id: Set(level_id),
                to_level_id: Set(to_level_id),
            })
            .collect();
        if !to_insert.is_empty() {
            LevelNextLevels::insert_many(to_insert)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}
