//! 计分与侧栏统计
//!
//! 这里只做纯计算；物件列表由仓库层按"每个访问过的关卡出现一次"展开后传入，
//! 同一物件出现在多个关卡中会被计入多次。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::game_objects;
use crate::entity::variety::Variety;

/// 物件点数之和，空集合为 0
pub fn total_points<'a, I>(objects: I) -> i64
where
    I: IntoIterator<Item = &'a game_objects::Model>,
{
    objects.into_iter().map(|obj| i64::from(obj.points)).sum()
}

/// 单个类别的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarietyTally {
    pub encountered: u32,
    pub points: i64,
}

/// 侧栏数据：按类别汇总玩家遇到的物件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarData {
    pub levels_played: u64,
    pub varieties: BTreeMap<Variety, VarietyTally>,
}

impl SidebarData {
    pub fn from_objects<'a, I>(levels_played: u64, objects: I) -> Self
    where
        I: IntoIterator<Item = &'a game_objects::Model>,
    {
        let mut varieties: BTreeMap<Variety, VarietyTally> = BTreeMap::new();
        for obj in objects {
            let tally = varieties.entry(obj.variety).or_default();
            tally.encountered += 1;
            tally.points += i64::from(obj.points);
        }

        SidebarData {
            levels_played,
            varieties,
        }
    }

    pub fn total_points(&self) -> i64 {
        self.varieties.values().map(|tally| tally.points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: i32, variety: Variety, points: i32) -> game_objects::Model {
        game_objects::Model {
            id,
            name: format!("object {}", id),
            slug: format!("object-{}", id),
            variety,
            points,
        }
    }

    #[test]
    fn empty_set_scores_zero() {
        assert_eq!(total_points(&[]), 0);
        assert_eq!(SidebarData::from_objects(0, &[]), SidebarData::default());
    }

    #[test]
    fn sums_points_including_negative_ones() {
        let objects = [
            object(1, Variety::Advertisement, -3),
            object(2, Variety::Life, 8),
            object(3, Variety::Poop, 5),
        ];
        assert_eq!(total_points(&objects), 10);
    }

    #[test]
    fn buckets_by_variety() {
        let objects = [
            object(1, Variety::Advertisement, 2),
            object(2, Variety::Advertisement, 3),
            object(3, Variety::Life, 7),
            // 同一物件在两个关卡中各出现一次
            object(3, Variety::Life, 7),
        ];
        let sidebar = SidebarData::from_objects(3, &objects);

        assert_eq!(sidebar.levels_played, 3);
        assert_eq!(
            sidebar.varieties[&Variety::Advertisement],
            VarietyTally {
                encountered: 2,
                points: 5
            }
        );
        assert_eq!(
            sidebar.varieties[&Variety::Life],
            VarietyTally {
                encountered: 2,
                points: 14
            }
        );
        assert!(!sidebar.varieties.contains_key(&Variety::Poop));
        assert_eq!(sidebar.total_points(), total_points(&objects));
    }
}
