//! 数据传输对象 (DTO)
//!
//! 内容编辑、目录导入与角色创建使用的输入结构。

use crate::entity::variety::Variety;
use serde::{Deserialize, Deserializer, Serialize};

/// 辅助函数：支持 Option<Option<T>> 的反序列化
/// 用于区分"未提供字段"和"显式设为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// 角色创建表单
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerForm {
    pub name: String,
}

/// 用于插入物件的数据结构，未给出 slug 时由 name 推导
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertGameObjectData {
    pub name: String,
    pub variety: Variety,
    pub points: i32,
    /// 显式 slug，用于按原样恢复导出的目录
    #[serde(default)]
    pub slug: Option<String>,
}

/// 用于更新物件的数据结构
///
/// 修改 name 不会重新生成 slug，需要显式调用 reslug。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateGameObjectData {
    pub name: Option<String>,
    pub variety: Option<Variety>,
    pub points: Option<i32>,
}

/// 用于插入关卡的数据结构，未给出 slug 时由 name 推导
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InsertLevelData {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    pub button_text: String,
    #[serde(default)]
    pub img_src: String,
    #[serde(default)]
    pub img_attribution: String,
    #[serde(default)]
    pub sidebar: bool,
}

/// 用于更新关卡的数据结构
///
/// 所有字段均为 Option，允许部分更新。
/// 图片字段使用 Option<Option<T>>，显式 null 会清空为空字符串。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateLevelData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub button_text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub img_src: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub img_attribution: Option<Option<String>>,
    pub sidebar: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_missing_from_null() {
        let update: UpdateLevelData =
            serde_json::from_str(r#"{"img_src": null, "sidebar": true}"#).unwrap();
        assert_eq!(update.img_src, Some(None));
        assert_eq!(update.img_attribution, None);
        assert_eq!(update.sidebar, Some(true));
    }

    #[test]
    fn level_images_default_to_empty() {
        let level: InsertLevelData = serde_json::from_str(
            r#"{"name": "Beginning", "description": "You wake up.", "button_text": "Start"}"#,
        )
        .unwrap();
        assert!(level.img_src.is_empty());
        assert!(level.slug.is_none());
        assert!(!level.sidebar);
    }
}
