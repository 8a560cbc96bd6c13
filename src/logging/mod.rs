//! # 日志记录模块 (Logging Module)
//!
//! ## 业务说明
//! 日志记录模块负责服务运行过程中的信息记录，包括用户操作、认证失败、数据库异常等
//! 为故障排查和审计追踪提供日志支持
//!
//! ## 日志功能
//! - **统一格式**: `[时间] [级别] [模块] - 消息`
//! - **级别控制**: 由配置 `logging.log_level` 或 `RUST_LOG` 决定
//! - **标签宏**: 以固定前缀标记关键问题，便于检索
//!
//! ## Rust知识点
//! - **日志宏**: 使用log crate的宏系统
//! - **环境配置**: 通过env_logger进行环境变量配置
//! - **格式化**: 自定义日志输出格式和时间戳

pub mod logger;

pub use logger::*;

/// 便捷日志宏 - 只记录4类核心问题，避免日志冗余

/// 记录用户操作日志（登录、写入类 RPC 调用）
#[macro_export]
macro_rules! log_user_operation {
    ($msg:expr) => {
        log::info!("[用户操作] {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::info!("[用户操作] {}", format!($msg, $($arg)*));
    };
}

/// 记录认证失败日志（会话无效、凭证错误）
#[macro_export]
macro_rules! log_auth_failure {
    ($msg:expr) => {
        log::warn!("[认证失败] {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::warn!("[认证失败] {}", format!($msg, $($arg)*));
    };
}

/// 记录数据库失败日志
#[macro_export]
macro_rules! log_database_failure {
    ($msg:expr) => {
        log::error!("[数据库失败] {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::error!("[数据库失败] {}", format!($msg, $($arg)*));
    };
}

/// 记录用户配置操作警告
#[macro_export]
macro_rules! log_config_warning {
    ($msg:expr) => {
        log::warn!("[配置警告] {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::warn!("[配置警告] {}", format!($msg, $($arg)*));
    };
}

// 重新导出宏
pub use log_user_operation;
pub use log_auth_failure;
pub use log_database_failure;
pub use log_config_warning;
