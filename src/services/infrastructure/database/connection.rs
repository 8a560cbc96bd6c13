// 数据库连接建立：连接池参数与 SQLite 内存库的特殊处理

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use crate::utils::config::DatabaseConfig;
use crate::utils::error::{AppError, AppResult};

/// 是否为 SQLite 内存库
///
/// 内存库的每个连接都是一个独立的数据库，因此连接池必须固定为 1 个连接
pub fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}

/// 按配置构建连接参数
pub fn build_connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let url = config.url.trim().to_string();
    let memory = is_sqlite_memory(&url);

    let mut connect_opts = ConnectOptions::new(url);
    if memory {
        connect_opts.max_connections(1).min_connections(1);
    } else {
        connect_opts
            .max_connections(config.max_connections)
            .min_connections(config.min_connections);
    }
    connect_opts
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging); // 默认关闭底层 sqlx 日志，减少噪声

    connect_opts
}

/// 建立数据库连接
pub async fn connect(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let connect_opts = build_connect_options(config);
    Database::connect(connect_opts)
        .await
        .map_err(|db_err| AppError::persistence_error(format!("连接数据库失败: {}", db_err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(is_sqlite_memory("sqlite://file:eli?mode=memory&cache=shared"));
        assert!(!is_sqlite_memory("postgres://user@localhost/eli"));
        assert!(!is_sqlite_memory("sqlite://./eli.sqlite?mode=rwc"));
    }

    #[test]
    fn test_memory_pool_is_single_connection() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let opts = build_connect_options(&config);
        assert_eq!(opts.get_max_connections(), Some(1));
        assert_eq!(opts.get_min_connections(), Some(1));

        let config = DatabaseConfig {
            url: "postgres://localhost/eli".to_string(),
            max_connections: 7,
            ..DatabaseConfig::default()
        };
        let opts = build_connect_options(&config);
        assert_eq!(opts.get_max_connections(), Some(7));
    }
}
