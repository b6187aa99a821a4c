//! 错误类型
//!
//! 仓库层直接返回 `DbErr`，服务层在这里把存储错误归类为领域错误。

use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("数据库错误: {0}")]
    Database(#[from] DbErr),

    /// 由名称推导出的 slug 已被其他记录占用
    #[error("slug `{slug}` 已被占用")]
    SlugTaken { slug: String },

    /// 名称推导不出任何 slug 字符
    #[error("名称 `{0}` 无法生成有效的 slug")]
    InvalidName(String),

    #[error("slug `{slug}` 超过 {max} 个字符")]
    SlugTooLong { slug: String, max: usize },

    #[error("{entity} `{key}` 不存在")]
    NotFound { entity: &'static str, key: String },

    #[error("内容目录无效: {0}")]
    InvalidCatalog(String),

    /// 数据目录或备份目录无法确定
    #[error("数据目录不可用: {0}")]
    DataDir(String),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;

impl GameError {
    /// 归类插入/更新时的存储错误：唯一约束冲突视为 slug 冲突
    pub fn from_write(err: DbErr, slug: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => GameError::SlugTaken {
                slug: slug.to_string(),
            },
            _ => GameError::Database(err),
        }
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        GameError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// 是否属于调用方可以修正的请求错误（而非服务端故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GameError::SlugTaken { .. }
                | GameError::SlugTooLong { .. }
                | GameError::InvalidName(_)
                | GameError::NotFound { .. }
                | GameError::InvalidCatalog(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_stay_database_errors() {
        let err = GameError::from_write(DbErr::Custom("boom".to_string()), "amy");
        assert!(matches!(err, GameError::Database(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn domain_errors_are_client_errors() {
        assert!(GameError::InvalidName("!!!".into()).is_client_error());
        assert!(GameError::not_found("关卡", "forest").is_client_error());
        assert_eq!(
            GameError::SlugTaken {
                slug: "amy".into()
            }
            .to_string(),
            "slug `amy` 已被占用"
        );
    }
}
