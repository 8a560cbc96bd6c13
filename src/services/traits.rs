/// 服务层基础trait定义
/// 提供各层服务的接口规范，支持依赖注入和测试

use async_trait::async_trait;
use crate::utils::error::AppResult;
use crate::models::structs::NotificationPayload;

/// 基础服务trait，所有长生命周期服务都应实现
#[async_trait]
pub trait BaseService: Send + Sync {
    /// 服务名称
    fn service_name(&self) -> &'static str;

    /// 初始化服务
    async fn initialize(&mut self) -> AppResult<()>;

    /// 关闭服务
    async fn shutdown(&mut self) -> AppResult<()>;

    /// 健康检查
    async fn health_check(&self) -> AppResult<()>;
}

/// 所有者通知服务trait
///
/// 返回 `Ok(true)` 表示通知已被上游接收；
/// 上游返回非 2xx 或网络失败时返回 `Ok(false)`；
/// 参数校验失败或服务未配置时返回错误
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify_owner(&self, payload: NotificationPayload) -> AppResult<bool>;
}
