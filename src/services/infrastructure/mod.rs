//! 基础设施层：数据库连接与外部通知

pub mod database;
pub mod notification_service;

pub use database::DatabaseHandle;
pub use notification_service::ForgeNotificationService;
