//! # 应用服务层
//!
//! 每个服务持有一个 [`DatabaseHandle`] 克隆：
//! - 查询类方法在数据库不可用时返回空列表 / `None` / 全零统计
//! - 写入类方法在数据库不可用时返回 `Database not available`
//!
//! 单行更新找不到目标时返回 `NotFoundError`

pub mod campus_service;
pub mod equipment_service;
pub mod tracking_service;
pub mod alert_service;
pub mod incident_service;
pub mod event_service;
pub mod dashboard_service;
pub mod audit_service;
pub mod settings_service;
pub mod scenario_service;


use sea_orm::DbErr;
use crate::utils::error::AppError;

pub use campus_service::CampusService;
pub use equipment_service::EquipmentService;
pub use tracking_service::TrackingService;
pub use alert_service::AlertService;
pub use incident_service::IncidentService;
pub use event_service::EventService;
pub use dashboard_service::DashboardService;
pub use audit_service::AuditService;
pub use settings_service::SettingsService;
pub use scenario_service::ScenarioService;

/// 把数据库错误包装为带上下文的持久化错误
pub(crate) fn persistence(context: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| AppError::persistence_error(format!("{}: {}", context, e))
}

/// 分组计数结果转为无符号计数
pub(crate) fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
