//! 关卡推进
//!
//! 玩家请求某个 slug 时：
//! 1. 找不到对应关卡 → 视为内容结束，玩家标记为通关，导航到排行榜；
//! 2. 找到 → 记录访问、重新计分，再根据关卡的出边生成下一步选项。
//!
//! 关卡图是一般有向图，可以有环，这里只看当前关卡的出边。

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::database::repository::{
    levels_repository::LevelsRepository, players_repository::PlayersRepository,
};
use crate::entity::{levels, players};
use crate::error::{GameError, Result};
use crate::game::scoring::SidebarData;

/// 没有出边的关卡唯一的选项
pub const RESULTS_BUTTON_TEXT: &str = "See results";

/// 选项指向的位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "slug")]
pub enum ChoiceTarget {
    Level(String),
    Leaderboard,
}

/// 一个导航按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub target: ChoiceTarget,
}

impl Choice {
    pub fn results() -> Self {
        Choice {
            label: RESULTS_BUTTON_TEXT.to_string(),
            target: ChoiceTarget::Leaderboard,
        }
    }
}

/// 玩家进入关卡后看到的场景
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// 已更新分数的玩家
    pub player: players::Model,
    pub level: levels::Model,
    pub choices: Vec<Choice>,
    /// 仅当关卡开启侧栏时提供
    pub sidebar: Option<SidebarData>,
    pub first_visit: bool,
}

/// 一次导航的结果
#[derive(Debug, Clone)]
pub enum Progress {
    Scene(Box<Scene>),
    /// 请求的 slug 没有关卡，玩家已通关
    Completed(players::Model),
}

/// 由出边生成选项，按边的顺序；没有出边时只给出查看结果
pub fn choices_for(next_levels: &[levels::Model]) -> Vec<Choice> {
    if next_levels.is_empty() {
        return vec![Choice::results()];
    }

    next_levels
        .iter()
        .map(|level| Choice {
            label: level.button_text.clone(),
            target: ChoiceTarget::Level(level.slug.clone()),
        })
        .collect()
}

/// 玩家请求 level_slug 时的状态转移
///
/// 整个转移在一个事务内完成；同一玩家的并发请求以最后写入为准
pub async fn visit_level(
    db: &DatabaseConnection,
    player_id: i32,
    level_slug: &str,
) -> Result<Progress> {
    let txn = db.begin().await?;

    let Some(level) = LevelsRepository::find_by_slug(&txn, level_slug).await? else {
        let player = PlayersRepository::set_completed(&txn, player_id).await?;
        txn.commit().await?;

        log::info!(
            "玩家 {} 请求的关卡 `{}` 不存在，标记为通关 (score={})",
            player.id,
            level_slug,
            player.score
        );
        return Ok(Progress::Completed(player));
    };

    let first_visit = PlayersRepository::record_visit(&txn, player_id, level.id).await?;
    let score = PlayersRepository::update_score(&txn, player_id).await?;

    let next_levels = LevelsRepository::next_levels(&txn, level.id).await?;
    let choices = choices_for(&next_levels);

    let sidebar = if level.sidebar {
        Some(PlayersRepository::prepare_sidebar_data(&txn, player_id).await?)
    } else {
        None
    };

    let player = PlayersRepository::find_by_id(&txn, player_id)
        .await?
        .ok_or_else(|| GameError::not_found("玩家", player_id))?;

    txn.commit().await?;

    log::debug!(
        "玩家 {} 进入关卡 {} (首次={}, score={}, 选项数={})",
        player_id,
        level.slug,
        first_visit,
        score,
        choices.len()
    );

    Ok(Progress::Scene(Box::new(Scene {
        player,
        level,
        choices,
        sidebar,
        first_visit,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: i32, slug: &str, button_text: &str) -> levels::Model {
        levels::Model {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            button_text: button_text.to_string(),
            img_src: String::new(),
            img_attribution: String::new(),
            sidebar: false,
        }
    }

    #[test]
    fn dead_end_offers_single_results_choice() {
        let choices = choices_for(&[]);
        assert_eq!(choices, vec![Choice::results()]);
        assert_eq!(choices[0].target, ChoiceTarget::Leaderboard);
    }

    #[test]
    fn one_choice_per_edge_in_order() {
        let next = [
            level(3, "forest", "Walk into the trees"),
            level(2, "mall", "Go shopping"),
        ];
        let choices = choices_for(&next);

        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, "Walk into the trees");
        assert_eq!(choices[0].target, ChoiceTarget::Level("forest".into()));
        assert_eq!(choices[1].target, ChoiceTarget::Level("mall".into()));
    }
}
