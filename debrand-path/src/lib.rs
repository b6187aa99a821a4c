use std::path::{Path, PathBuf};

/// 数据目录相关常量
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "debrand.db";
pub const DB_BACKUP_SUBDIR: &str = "backups";
pub const RESOURCE_DIR: &str = "resources";

/// 判断是否处于便携模式
///
/// 检测逻辑：可执行文件同级目录下存在 resources/data/debrand.db
pub fn is_portable_mode() -> bool {
    match exe_dir() {
        Ok(dir) => is_portable_layout(&dir),
        Err(_) => false,
    }
}

/// 判断给定目录是否具有便携模式的目录结构
pub fn is_portable_layout(exe_dir: &Path) -> bool {
    let portable_data_dir = exe_dir.join(RESOURCE_DIR).join(DB_DATA_DIR);
    portable_data_dir.is_dir() && portable_data_dir.join(DB_FILE_NAME).exists()
}

fn exe_dir() -> Result<PathBuf, String> {
    let exe_path = std::env::current_exe().map_err(|e| format!("无法获取可执行文件路径: {}", e))?;
    exe_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| "无法获取可执行文件父目录".to_string())
}

/// 获取基础数据目录
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    get_base_data_dir_for_mode(is_portable_mode())
}

/// 获取指定模式的基础数据目录
pub fn get_base_data_dir_for_mode(portable: bool) -> Result<PathBuf, String> {
    if portable {
        Ok(exe_dir()?.join(RESOURCE_DIR))
    } else {
        get_system_data_dir()
    }
}

/// 获取系统数据目录（跨平台）
fn get_system_data_dir() -> Result<PathBuf, String> {
    use directories::BaseDirs;

    let base_dirs = BaseDirs::new().ok_or_else(|| "无法获取系统目录信息".to_string())?;

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        Ok(base_dirs.data_dir().join("org.debrand.game"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        Ok(base_dirs.data_dir().join("debrand"))
    }
}

/// 获取数据库文件路径
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(db_path_in(&get_base_data_dir()?))
}

/// 获取默认的数据库备份目录
pub fn get_default_db_backup_path() -> Result<PathBuf, String> {
    Ok(backup_dir_in(&get_base_data_dir()?))
}

/// 基础目录下的数据库文件路径
pub fn db_path_in(base_dir: &Path) -> PathBuf {
    base_dir.join(DB_DATA_DIR).join(DB_FILE_NAME)
}

/// 基础目录下的备份目录
pub fn backup_dir_in(base_dir: &Path) -> PathBuf {
    base_dir.join(DB_DATA_DIR).join(DB_BACKUP_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_joined_under_data_dir() {
        let base = Path::new("/srv/debrand");
        assert_eq!(db_path_in(base), Path::new("/srv/debrand/data/debrand.db"));
        assert_eq!(backup_dir_in(base), Path::new("/srv/debrand/data/backups"));
    }

    #[test]
    fn missing_resources_is_not_portable() {
        let dir = std::env::temp_dir().join("debrand-path-not-portable");
        assert!(!is_portable_layout(&dir));
    }
}
