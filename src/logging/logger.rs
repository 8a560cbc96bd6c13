/// 基于 env_logger 的日志初始化
use std::io::Write;
use chrono::Local;
use crate::utils::config::LoggingConfig;

/// 将配置中的级别字符串转换为 `log::LevelFilter`，无法识别时回退到 Info
pub fn parse_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" | "warning" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

/// 初始化全局日志
///
/// 输出格式: `[2024-01-01 12:00:00.000] [INFO] [eli_lib::interfaces::http] - 消息`
///
/// `RUST_LOG` 存在时其规则叠加在配置级别之上；
/// sqlx / hyper 等依赖的日志固定在 Warn，避免淹没业务日志
pub fn init_logger(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(parse_level(&config.log_level))
        .filter_module("sqlx", log::LevelFilter::Warn)
        .filter_module("hyper", log::LevelFilter::Warn)
        .filter_module("sea_orm", log::LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    if builder.try_init().is_err() {
        log::debug!("日志系统已初始化，跳过重复初始化");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), log::LevelFilter::Warn);
        assert_eq!(parse_level("error"), log::LevelFilter::Error);
        assert_eq!(parse_level("nonsense"), log::LevelFilter::Info);
    }

    #[test]
    fn test_init_logger_twice_is_harmless() {
        let config = LoggingConfig::default();
        init_logger(&config);
        init_logger(&config);
        crate::log_user_operation!("测试日志 {}", 1);
    }
}
