//! 过程实现，按路由前缀分组

mod system;
mod auth;
mod campus;
mod equipment;
mod tracking;
mod alerts;
mod incidents;
mod admin;

use serde_json::Value;
use super::context::RequestContext;
use super::rpc::{parse_optional_input, to_data};
use super::state::AppState;
use crate::models::structs::{AuditRecord, EventFilter};
use crate::utils::error::{AppError, AppResult};

/// 调用一个已通过方法与权限检查的过程
pub async fn dispatch(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let router = path.split('.').next().unwrap_or_default();
    match router {
        "system" => system::call(state, ctx, path, input).await,
        "auth" => auth::call(state, ctx, path, input).await,
        "buildings" | "floors" | "zones" => campus::call(state, ctx, path, input).await,
        "cameras" | "sensors" | "accessReaders" | "wifiAccessPoints" => {
            equipment::call(state, ctx, path, input).await
        }
        "entities" | "locations" => tracking::call(state, ctx, path, input).await,
        "alerts" => alerts::call(state, ctx, path, input).await,
        "incidents" => incidents::call(state, ctx, path, input).await,
        "events" => to_data(state.events.list_events(parse_optional_input::<EventFilter>(input)?).await?),
        "dashboard" => to_data(state.dashboard.overview().await?),
        "settings" | "scenarios" | "audit" => admin::call(state, ctx, path, input).await,
        _ => Err(unknown(path)),
    }
}

fn unknown(path: &str) -> AppError {
    AppError::not_found_error("Procedure", format!("No procedure on path \"{}\"", path))
}

/// 为写入成功的 mutation 追加审计日志
async fn audit(
    state: &AppState,
    ctx: &RequestContext,
    action: &str,
    entity_type: &str,
    entity_id: Option<i32>,
    details: Value,
) {
    state
        .audit
        .record(AuditRecord {
            user_id: ctx.user_id(),
            action: action.to_string(),
            entity_type: Some(entity_type.to_string()),
            entity_id,
            details: Some(details),
            ip_address: ctx.ip_address.clone(),
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use crate::services::infrastructure::DatabaseHandle;
    use crate::services::traits::MockNotificationService;
    use crate::utils::config::{AppConfig, AuthConfig};

    fn state_with(notifier: MockNotificationService) -> AppState {
        let config = AppConfig {
            auth: AuthConfig {
                bcrypt_cost: 4,
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        };
        AppState::with_notifier(config, DatabaseHandle::unavailable(), Arc::new(notifier)).unwrap()
    }

    #[tokio::test]
    async fn test_notify_owner_reports_delivery() {
        let mut notifier = MockNotificationService::new();
        notifier
            .expect_notify_owner()
            .withf(|payload| payload.title == "Perimeter alarm")
            .times(1)
            .returning(|_| Ok(false));
        let state = state_with(notifier);

        let mut ctx = RequestContext::default();
        let input = json!({ "title": "Perimeter alarm", "content": "Gate 3" });
        let result = dispatch(&state, &mut ctx, "system.notifyOwner", input).await.unwrap();
        assert_eq!(result, json!({ "success": false }));
    }

    #[tokio::test]
    async fn test_logout_clears_both_cookies() {
        let state = state_with(MockNotificationService::new());
        let mut ctx = RequestContext::default();

        let result = dispatch(&state, &mut ctx, "auth.logout", Value::Null).await.unwrap();
        assert_eq!(result, json!({ "success": true }));
        assert_eq!(ctx.response_cookies.len(), 2);
        assert!(ctx.response_cookies[0].starts_with("app_session_id=;"));
        assert!(ctx.response_cookies[1].starts_with("demo_token=;"));
        assert!(ctx.response_cookies.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_optional_inputs_accept_null() {
        let state = state_with(MockNotificationService::new());
        let mut ctx = RequestContext::default();

        for path in ["floors.list", "cameras.list", "entities.list", "alerts.list", "events.list"] {
            let result = dispatch(&state, &mut ctx, path, Value::Null).await.unwrap();
            assert_eq!(result, json!([]), "{}", path);
        }
        assert!(dispatch(&state, &mut ctx, "zones.list", Value::Null).await.is_err());
        assert!(dispatch(&state, &mut ctx, "nowhere.list", Value::Null).await.is_err());
    }
}
