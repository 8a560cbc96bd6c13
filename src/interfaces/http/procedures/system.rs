use serde_json::{json, Value};
use super::unknown;
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{HealthInput, NotificationPayload, SuccessResponse};
use crate::utils::error::{AppError, AppResult};

pub(super) async fn call(
    state: &AppState,
    _ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    match path {
        "system.health" => {
            let input: HealthInput = parse_input(input)?;
            if input.timestamp < 0.0 {
                return Err(AppError::validation_error("timestamp cannot be negative"));
            }
            Ok(json!({ "ok": true }))
        }
        "system.notifyOwner" => {
            let payload: NotificationPayload = parse_input(input)?;
            let delivered = state.notifier.notify_owner(payload).await?;
            to_data(SuccessResponse { success: delivered })
        }
        _ => Err(unknown(path)),
    }
}
