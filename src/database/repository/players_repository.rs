use std::collections::{HashMap, HashSet};

use crate::entity::prelude::*;
use crate::entity::{game_objects, level_game_objects, levels, player_levels_played, players};
use crate::game::scoring::{total_points, SidebarData};
use crate::game::slug::slugify;
use sea_orm::*;
use serde::{Deserialize, Serialize};

/// 排行榜排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardOrder {
    /// 分数从高到低，同分按创建顺序
    #[default]
    Score,
    Name,
    /// 最近完成的在前
    Newest,
}

/// 玩家数据仓库
pub struct PlayersRepository;

impl PlayersRepository {
    // ==================== 玩家 CRUD 操作 ====================

    /// 创建玩家，slug 在首次保存时由 name 推导
    pub async fn create<C>(db: &C, name: String) -> Result<players::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().timestamp() as i32;

        let player = players::ActiveModel {
            id: NotSet,
            slug: Set(slugify(&name)),
            name: Set(name),
            score: Set(0),
            completed: Set(false),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        player.insert(db).await
    }

    /// 根据 ID 查询玩家
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<players::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Players::find_by_id(id).one(db).await
    }

    /// 根据 slug 查询玩家
    pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<players::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Players::find()
            .filter(players::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    /// 按当前名称重新生成 slug
    pub async fn reslug<C>(db: &C, id: i32) -> Result<players::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let existing = Players::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Player not found".to_string()))?;

        let slug = slugify(&existing.name);
        let mut active: players::ActiveModel = existing.into();
        active.slug = Set(slug);
        active.updated_at = Set(Some(chrono::Utc::now().timestamp() as i32));

        active.update(db).await
    }

    /// 删除玩家（访问记录级联删除）
    pub async fn delete<C>(db: &C, id: i32) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        Players::delete_by_id(id).exec(db).await
    }

    // ==================== 游玩进度 ====================

    /// 记录一次关卡访问
    ///
    /// levels_played 是集合，重复访问不会新增记录。返回是否为首次访问
    pub async fn record_visit<C>(db: &C, player_id: i32, level_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let already_played = PlayerLevelsPlayed::find()
            .filter(
                player_levels_played::Column::PlayerId
                    .eq(player_id)
                    .and(player_levels_played::Column::LevelId.eq(level_id)),
            )
            .count(db)
            .await?
            > 0;
        if already_played {
            return Ok(false);
        }

        let visit = player_levels_played::ActiveModel {
            player_id: Set(player_id),
            level_id: Set(level_id),
        };
        PlayerLevelsPlayed::insert(visit)
            .exec_without_returning(db)
            .await?;

        Ok(true)
    }

    /// 获取玩家访问过的关卡 ID
    pub async fn levels_played_ids<C>(db: &C, player_id: i32) -> Result<Vec<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        let visits = PlayerLevelsPlayed::find()
            .filter(player_levels_played::Column::PlayerId.eq(player_id))
            .all(db)
            .await?;

        Ok(visits.into_iter().map(|visit| visit.level_id).collect())
    }

    /// 获取玩家访问过的关卡
    pub async fn levels_played<C>(db: &C, player_id: i32) -> Result<Vec<levels::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Levels::find()
            .inner_join(PlayerLevelsPlayed)
            .filter(player_levels_played::Column::PlayerId.eq(player_id))
            .order_by_asc(levels::Column::Id)
            .all(db)
            .await
    }

    /// 玩家在访问过的关卡中遇到的所有物件
    ///
    /// 每个关卡各展开一次：同一物件出现在两个访问过的关卡里会返回两次
    pub async fn encountered_objects<C>(
        db: &C,
        player_id: i32,
    ) -> Result<Vec<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let level_ids = Self::levels_played_ids(db, player_id).await?;
        if level_ids.is_empty() {
            return Ok(Vec::new());
        }

        // 一次查询取出所有关联，避免逐关卡查询
        let links = LevelGameObjects::find()
            .filter(level_game_objects::Column::LevelId.is_in(level_ids))
            .all(db)
            .await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let object_ids: HashSet<i32> = links.iter().map(|link| link.game_object_id).collect();
        let objects: HashMap<i32, game_objects::Model> = GameObjects::find()
            .filter(game_objects::Column::Id.is_in(object_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|obj| (obj.id, obj))
            .collect();

        Ok(links
            .iter()
            .filter_map(|link| objects.get(&link.game_object_id).cloned())
            .collect())
    }

    /// 重新计算并保存玩家分数
    ///
    /// 每次都按当前内容从头计算：管理员可能在玩家访问之后修改了关卡内容
    pub async fn update_score<C>(db: &C, player_id: i32) -> Result<i64, DbErr>
    where
        C: ConnectionTrait,
    {
        let objects = Self::encountered_objects(db, player_id).await?;
        let score = total_points(&objects);

        let player = players::ActiveModel {
            id: Set(player_id),
            score: Set(score),
            updated_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
            ..Default::default()
        };
        player.update(db).await?;

        Ok(score)
    }

    /// 标记玩家已通关
    pub async fn set_completed<C>(db: &C, player_id: i32) -> Result<players::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let player = players::ActiveModel {
            id: Set(player_id),
            completed: Set(true),
            updated_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
            ..Default::default()
        };

        player.update(db).await
    }

    /// 侧栏数据：按类别统计玩家遇到的物件，只读
    pub async fn prepare_sidebar_data<C>(db: &C, player_id: i32) -> Result<SidebarData, DbErr>
    where
        C: ConnectionTrait,
    {
        let levels_played = PlayerLevelsPlayed::find()
            .filter(player_levels_played::Column::PlayerId.eq(player_id))
            .count(db)
            .await?;
        let objects = Self::encountered_objects(db, player_id).await?;

        Ok(SidebarData::from_objects(levels_played, &objects))
    }

    // ==================== 排行榜 ====================

    /// 获取所有已通关的玩家
    pub async fn find_completed<C>(
        db: &C,
        order: LeaderboardOrder,
    ) -> Result<Vec<players::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let query = Players::find().filter(players::Column::Completed.eq(true));

        let query = match order {
            LeaderboardOrder::Score => query
                .order_by_desc(players::Column::Score)
                .order_by_asc(players::Column::Id),
            LeaderboardOrder::Name => query
                .order_by_asc(players::Column::Name)
                .order_by_asc(players::Column::Id),
            LeaderboardOrder::Newest => query
                .order_by_desc(players::Column::UpdatedAt)
                .order_by_desc(players::Column::Id),
        };

        query.all(db).await
    }

    /// 已通关玩家数量
    pub async fn count_completed<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Players::find()
            .filter(players::Column::Completed.eq(true))
            .count(db)
            .await
    }
}
