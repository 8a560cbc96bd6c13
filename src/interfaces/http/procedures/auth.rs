use serde_json::{json, Value};
use super::unknown;
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{AuditRecord, DemoLoginInput, SuccessResponse};
use crate::services::auth::session_service::DEMO_USER_ID;
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    match path {
        "auth.me" => to_data(&ctx.user),
        "auth.logout" => {
            for cookie in state.session.clear_cookies(ctx.secure) {
                ctx.set_cookie(cookie);
            }
            if let Some(user) = &ctx.user {
                crate::log_user_operation!("用户 {} 已登出", user.open_id);
            }
            to_data(SuccessResponse::ok())
        }
        "auth.demoLogin" => {
            let input: DemoLoginInput = parse_input(input)?;
            let response = state.session.demo_login(&input)?;
            ctx.set_cookie(state.session.session_cookie(&response.token, ctx.secure));

            if state.db.is_available() {
                state.session.record_login(&state.db, &input.username).await;
                state
                    .audit
                    .record(AuditRecord {
                        user_id: Some(DEMO_USER_ID),
                        action: path.to_string(),
                        entity_type: Some("user".to_string()),
                        entity_id: Some(DEMO_USER_ID),
                        details: Some(json!({ "username": input.username })),
                        ip_address: ctx.ip_address.clone(),
                    })
                    .await;
            }
            to_data(response)
        }
        _ => Err(unknown(path)),
    }
}
