use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use migration::{Migrator, MigratorTrait};

use crate::error::GameError;

// ==================== 数据库连接管理 ====================

/// 将数据库文件路径转换为 sqlite 连接字符串
pub fn sqlite_url_for(db_path: &Path) -> Result<String, DbErr> {
    // 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;

    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// 默认数据库连接字符串（数据目录下的 debrand.db）
pub fn default_database_url() -> Result<String, DbErr> {
    let db_path = debrand_path::get_db_path().map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))?;

    // 如果数据库不存在，创建目录
    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
            })?;
            log::info!("首次启动，创建数据库目录: {}", parent.display());
        }
    }

    sqlite_url_for(&db_path)
}

/// Establish a SeaORM database connection.
pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(1) // 对于 SQLite，连接池大小为 1 即可（内存库也必须共用同一连接）
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    log::debug!("连接数据库: {}", database_url);
    Database::connect(options).await
}

/// 建立连接并执行所有待运行的迁移
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let conn = establish_connection(database_url).await?;

    log::info!("开始执行数据库迁移...");
    Migrator::up(&conn, None).await?;
    log::info!("数据库迁移完成");

    Ok(conn)
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}

// ==================== 数据库备份 ====================

/// 生成带时间戳的备份文件名
fn generate_backup_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    format!("debrand_{}.db", timestamp)
}

/// 解析备份目标目录
///
/// 如果提供了自定义路径且非空，则使用自定义路径，否则使用默认的 data/backups 目录
fn resolve_backup_dir(backup_dir: Option<&Path>) -> crate::error::Result<PathBuf> {
    let dir = match backup_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => debrand_path::get_default_db_backup_path().map_err(GameError::DataDir)?,
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// 使用 VACUUM INTO 进行数据库热备份
///
/// 此方法使用 SQLite 的 VACUUM INTO 语句，可以在数据库正在使用时安全地创建备份。
///
/// # Arguments
///
/// * `db` - 数据库连接
/// * `backup_dir` - 可选的备份目标目录。如果为空，则使用默认的 data/backups 目录
///
/// # Returns
///
/// 备份文件的路径
pub async fn backup_database(
    db: &DatabaseConnection,
    backup_dir: Option<&Path>,
) -> crate::error::Result<PathBuf> {
    let backup_dir = resolve_backup_dir(backup_dir)?;
    let target_path = backup_dir.join(generate_backup_filename());

    // SQLite 在 Windows 上也支持正斜杠，使用正斜杠可以避免转义问题
    let target_path_str = target_path
        .to_str()
        .ok_or_else(|| GameError::DataDir(format!("备份路径包含无效字符: {}", target_path.display())))?
        .replace('\\', "/");

    // 只需要转义单引号
    let escaped_path = target_path_str.replace('\'', "''");
    let vacuum_sql = format!("VACUUM INTO '{}'", escaped_path);

    db.execute_unprepared(&vacuum_sql).await?;

    log::info!("数据库热备份成功: {}", target_path_str);
    Ok(target_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_rwc_sqlite_url() {
        let path = std::env::temp_dir().join("debrand-test").join("debrand.db");
        let url = sqlite_url_for(&path).unwrap();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("debrand.db?mode=rwc"));
    }

    #[test]
    fn backup_names_are_timestamped() {
        let name = generate_backup_filename();
        assert!(name.starts_with("debrand_"));
        assert!(name.ends_with(".db"));
    }
}
