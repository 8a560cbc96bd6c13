//! # 所有者通知服务
//!
//! 通过 Forge API 的 `SendNotification` 接口向项目所有者推送消息。
//! 上游失败只记录告警并返回 `false`，不会让调用方的请求失败

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use crate::models::structs::NotificationPayload;
use crate::services::traits::{BaseService, NotificationService};
use crate::utils::config::NotificationConfig;
use crate::utils::error::{AppError, AppResult};

/// 标题最大长度（字符）
pub const TITLE_MAX_LENGTH: usize = 1200;
/// 内容最大长度（字符）
pub const CONTENT_MAX_LENGTH: usize = 20000;

const SEND_NOTIFICATION_PATH: &str = "webdevtoken.v1.WebDevService/SendNotification";

/// 校验并规范化通知内容（去除首尾空白）
pub fn validate_payload(payload: &NotificationPayload) -> AppResult<NotificationPayload> {
    let title = payload.title.trim();
    let content = payload.content.trim();

    if title.is_empty() {
        return Err(AppError::validation_error("Notification title is required."));
    }
    if content.is_empty() {
        return Err(AppError::validation_error("Notification content is required."));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(AppError::validation_error(format!(
            "Notification title must be at most {} characters.",
            TITLE_MAX_LENGTH
        )));
    }
    if content.chars().count() > CONTENT_MAX_LENGTH {
        return Err(AppError::validation_error(format!(
            "Notification content must be at most {} characters.",
            CONTENT_MAX_LENGTH
        )));
    }

    Ok(NotificationPayload {
        title: title.to_string(),
        content: content.to_string(),
    })
}

/// 拼接通知接口地址，基础地址缺少结尾斜杠时自动补齐
pub fn build_endpoint_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, SEND_NOTIFICATION_PATH)
    } else {
        format!("{}/{}", base_url, SEND_NOTIFICATION_PATH)
    }
}

/// 基于 reqwest 的 Forge 通知服务
pub struct ForgeNotificationService {
    client: Client,
    config: NotificationConfig,
}

impl ForgeNotificationService {
    /// 创建通知服务
    pub fn new(config: NotificationConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::service_initialization_error("ForgeNotificationService", e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationService for ForgeNotificationService {
    async fn notify_owner(&self, payload: NotificationPayload) -> AppResult<bool> {
        let payload = validate_payload(&payload)?;

        if self.config.forge_api_url.trim().is_empty() {
            return Err(AppError::service_not_configured("Notification service URL is not configured."));
        }
        if self.config.forge_api_key.trim().is_empty() {
            return Err(AppError::service_not_configured("Notification service API key is not configured."));
        }

        let endpoint = build_endpoint_url(self.config.forge_api_url.trim());
        let response = self
            .client
            .post(&endpoint)
            .header("accept", "application/json")
            .header("connect-protocol-version", "1")
            .bearer_auth(self.config.forge_api_key.trim())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                log::info!("所有者通知已发送: {}", payload.title);
                Ok(true)
            }
            Ok(resp) => {
                let status = resp.status();
                let detail = resp.text().await.unwrap_or_default();
                log::warn!(
                    "[Notification] Failed to notify owner ({}){}",
                    status,
                    if detail.is_empty() { String::new() } else { format!(": {}", detail) }
                );
                Ok(false)
            }
            Err(e) => {
                log::warn!("[Notification] Error calling notification service: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl BaseService for ForgeNotificationService {
    fn service_name(&self) -> &'static str {
        "ForgeNotificationService"
    }

    async fn initialize(&mut self) -> AppResult<()> {
        if self.config.forge_api_url.trim().is_empty() {
            crate::log_config_warning!("未配置 FORGE_API_URL，所有者通知不可用");
        }
        log::info!("{} 已初始化。", self.service_name());
        Ok(())
    }

    async fn shutdown(&mut self) -> AppResult<()> {
        log::info!("{} 已关闭。", self.service_name());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        if self.config.forge_api_url.trim().is_empty() || self.config.forge_api_key.trim().is_empty() {
            return Err(AppError::configuration_error("通知服务未配置"));
        }
        Ok(())
    }
}
