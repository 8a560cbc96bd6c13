//! # 服务层
//!
//! - `traits`: 服务接口（生命周期、通知）
//! - `infrastructure`: 数据库连接、外部通知
//! - `auth`: 演示会话
//! - `application`: 各业务领域的查询与写入
//! - `domain`: 位置模拟、演示数据生成

pub mod traits;
pub mod infrastructure;
pub mod auth;
pub mod application;
pub mod domain;

pub use traits::{BaseService, NotificationService};
pub use infrastructure::{DatabaseHandle, ForgeNotificationService};
pub use auth::{SessionService, SessionUser};
pub use application::*;
