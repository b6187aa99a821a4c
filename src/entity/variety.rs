//! 物件类别
//!
//! 数据库中以两位代码存储，序列化（目录文件、侧栏数据）时使用完整名称。
//! 反序列化同时接受完整名称和两位代码。

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(try_from = "String")]
pub enum Variety {
    #[sea_orm(string_value = "UN")]
    Unseen,
    #[sea_orm(string_value = "P")]
    Poop,
    #[sea_orm(string_value = "A")]
    Advertisement,
    #[sea_orm(string_value = "E")]
    Emergency,
    #[sea_orm(string_value = "B")]
    Branding,
    #[sea_orm(string_value = "L")]
    Life,
}

impl Variety {
    /// 展示用名称
    pub fn display_name(self) -> &'static str {
        match self {
            Variety::Unseen => "Unseen",
            Variety::Poop => "Poop",
            Variety::Advertisement => "Advertisement",
            Variety::Emergency => "Emergency",
            Variety::Branding => "Branding",
            Variety::Life => "Life",
        }
    }

    /// 从名称或两位代码解析（不区分大小写）
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::iter().find(|variety| {
            variety.display_name().eq_ignore_ascii_case(input)
                || variety.to_value().eq_ignore_ascii_case(input)
        })
    }
}

impl TryFrom<String> for Variety {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Variety::parse(&value).ok_or_else(|| format!("未知的物件类别: {}", value))
    }
}

impl std::fmt::Display for Variety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!(Variety::parse("poop"), Some(Variety::Poop));
        assert_eq!(Variety::parse("UN"), Some(Variety::Unseen));
        assert_eq!(Variety::parse(" Branding "), Some(Variety::Branding));
        assert_eq!(Variety::parse("l"), Some(Variety::Life));
        assert_eq!(Variety::parse("billboard"), None);
    }

    #[test]
    fn deserializes_names_and_codes() {
        let varieties: Vec<Variety> =
            serde_json::from_str(r#"["Advertisement", "E", "life"]"#).unwrap();
        assert_eq!(
            varieties,
            vec![Variety::Advertisement, Variety::Emergency, Variety::Life]
        );
        assert!(serde_json::from_str::<Variety>(r#""Billboard""#).is_err());
        assert_eq!(
            serde_json::to_string(&Variety::Poop).unwrap(),
            r#""Poop""#
        );
    }

    #[test]
    fn stores_two_letter_codes() {
        assert_eq!(Variety::Advertisement.to_value(), "A");
        assert_eq!(Variety::Emergency.to_value(), "E");
    }
}
