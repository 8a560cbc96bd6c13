//! # 数据库基础设施
//!
//! `DatabaseHandle` 封装一个可选的数据库连接：
//! - 配置了连接串时持有连接池
//! - 未配置时处于"不可用"状态，查询类调用返回空结果，写入类调用返回
//!   `Database not available`

pub mod connection;
pub mod schema;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use crate::services::traits::BaseService;
use crate::utils::config::DatabaseConfig;
use crate::utils::error::{AppError, AppResult};

pub use connection::{build_connect_options, connect, is_sqlite_memory};
pub use schema::{clear_demo_data, setup_schema};

/// 可选数据库连接句柄，克隆开销很小（内部为连接池句柄）
#[derive(Clone, Default)]
pub struct DatabaseHandle {
    conn: Option<DatabaseConnection>,
    auto_migrate: bool,
}

impl DatabaseHandle {
    /// 使用已建立的连接创建句柄
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn: Some(conn),
            auto_migrate: false,
        }
    }

    /// 创建不可用的句柄
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// 按配置连接；连接串为空时返回不可用句柄
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            crate::log_config_warning!("未配置数据库连接串，所有写入操作将返回 Database not available");
            return Ok(Self::unavailable());
        }

        let conn = connect(config).await?;
        log::info!("数据库连接已建立。");
        Ok(Self {
            conn: Some(conn),
            auto_migrate: config.auto_migrate,
        })
    }

    /// 数据库是否可用
    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    /// 可选连接，用于查询类操作
    pub fn connection(&self) -> Option<&DatabaseConnection> {
        self.conn.as_ref()
    }

    /// 必需连接，用于写入类操作
    pub fn require(&self) -> AppResult<&DatabaseConnection> {
        self.conn.as_ref().ok_or_else(AppError::database_unavailable)
    }
}

#[async_trait]
impl BaseService for DatabaseHandle {
    fn service_name(&self) -> &'static str {
        "DatabaseHandle"
    }

    async fn initialize(&mut self) -> AppResult<()> {
        if let (Some(conn), true) = (self.conn.as_ref(), self.auto_migrate) {
            setup_schema(conn).await?;
        }
        log::info!("{} 已初始化。", self.service_name());
        Ok(())
    }

    async fn shutdown(&mut self) -> AppResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| AppError::persistence_error(format!("关闭数据库连接失败: {}", e)))?;
        }
        log::info!("{} 已关闭。", self.service_name());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let conn = self.require()?;
        conn.ping().await.map_err(|db_err| {
            AppError::persistence_error(format!("数据库健康检查失败: {}", db_err))
        })?;
        log::debug!("数据库连接健康。");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_handle() {
        let handle = DatabaseHandle::from_config(&DatabaseConfig::default()).await.unwrap();
        assert!(!handle.is_available());
        assert!(handle.connection().is_none());

        let err = handle.require().unwrap_err();
        assert_eq!(err.client_message(), "Database not available");
        assert_eq!(err.http_status(), 500);
        assert!(handle.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_memory_handle_lifecycle() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let mut handle = DatabaseHandle::from_config(&config).await.unwrap();
        handle.initialize().await.unwrap();
        assert!(handle.is_available());
        handle.health_check().await.unwrap();

        // 建表可重复执行
        setup_schema(handle.require().unwrap()).await.unwrap();
        clear_demo_data(handle.require().unwrap()).await.unwrap();

        handle.shutdown().await.unwrap();
        assert!(!handle.is_available());
    }
}
