use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

/// 解析日志级别字符串
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(format!("无效的日志级别: {}", other)),
    }
}

/// 初始化日志：终端输出到 stderr，可选写入文件
///
/// 记录器本身按 Trace 注册，实际输出由 `log::max_level` 控制，便于运行时调整
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), String> {
    let initial = parse_level(level)?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("sqlx")
        .add_filter_ignore_str("sea_orm_migration")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Trace,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|e| format!("无法创建日志文件: {}", e))?;
        loggers.push(WriteLogger::new(LevelFilter::Trace, config, file));
    }

    CombinedLogger::init(loggers).map_err(|e| format!("日志初始化失败: {}", e))?;
    log::set_max_level(initial);
    Ok(())
}

/// 动态设置日志输出级别（不持久化）
pub fn set_log_level(level: &str) -> Result<(), String> {
    let lf = parse_level(level)?;
    log::set_max_level(lf);
    Ok(())
}

/// 获取当前日志级别
pub fn get_log_level() -> LogLevel {
    match log::max_level() {
        LevelFilter::Error => LogLevel::Error,
        LevelFilter::Warn => LogLevel::Warn,
        LevelFilter::Info => LogLevel::Info,
        LevelFilter::Debug => LogLevel::Debug,
        LevelFilter::Trace => LogLevel::Trace,
        LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("INFO"), Ok(LevelFilter::Info));
        assert_eq!(parse_level(" debug "), Ok(LevelFilter::Debug));
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn runtime_level_round_trips() {
        set_log_level("info").unwrap();
        assert_eq!(get_log_level(), LogLevel::Info);
        assert!(set_log_level("verbose").is_err());
        assert_eq!(get_log_level(), LogLevel::Info);
    }
}
