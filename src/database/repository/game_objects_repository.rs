use crate::database::dto::{InsertGameObjectData, UpdateGameObjectData};
use crate::entity::game_objects;
use crate::entity::prelude::*;
use crate::game::slug::slugify;
use sea_orm::*;

/// 计分物件仓库
pub struct GameObjectsRepository;

impl GameObjectsRepository {
    /// 创建物件，slug 在首次保存时确定，未显式给出时由 name 推导
    pub async fn create<C>(db: &C, data: InsertGameObjectData) -> Result<game_objects::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let game_object = game_objects::ActiveModel {
            id: NotSet,
            slug: Set(data.slug.unwrap_or_else(|| slugify(&data.name))),
            name: Set(data.name),
            variety: Set(data.variety),
            points: Set(data.points),
        };

        game_object.insert(db).await
    }

    /// 根据 ID 查询物件
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::find_by_id(id).one(db).await
    }

    /// 根据 slug 查询物件
    pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::find()
            .filter(game_objects::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    /// 获取所有物件（按 ID 排序）
    pub async fn find_all<C>(db: &C) -> Result<Vec<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::find()
            .order_by_asc(game_objects::Column::Id)
            .all(db)
            .await
    }

    /// 批量查询物件
    pub async fn find_by_ids<C>(db: &C, ids: Vec<i32>) -> Result<Vec<game_objects::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        GameObjects::find()
            .filter(game_objects::Column::Id.is_in(ids))
            .all(db)
            .await
    }

    /// 更新物件，slug 保持不变
    pub async fn update<C>(
        db: &C,
        id: i32,
        updates: UpdateGameObjectData,
    ) -> Result<game_objects::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let game_object = game_objects::ActiveModel {
            id: Set(id),
            name: updates.name.map_or(NotSet, Set),
            variety: updates.variety.map_or(NotSet, Set),
            points: updates.points.map_or(NotSet, Set),
            ..Default::default()
        };

        game_object.update(db).await
    }

    /// 按当前名称重新生成 slug
    pub async fn reslug<C>(db: &C, id: i32) -> Result<game_objects::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let existing = GameObjects::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Game object not found".to_string()))?;

        let slug = slugify(&existing.name);
        let mut active: game_objects::ActiveModel = existing.into();
        active.slug = Set(slug);

        active.update(db).await
    }

    /// 删除物件（关卡关联级联删除）
    pub async fn delete<C>(db: &C, id: i32) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::delete_by_id(id).exec(db).await
    }

    /// 获取物件总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        GameObjects::find().count(db).await
    }
}
