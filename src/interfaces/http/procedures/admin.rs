//! 设置、演示场景与审计日志

use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{AuditFilter, IdInput, SetSettingInput, SettingKeyInput, SuccessResponse};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    match path {
        "settings.list" => to_data(state.settings.list().await?),
        "settings.get" => {
            let SettingKeyInput { key } = parse_input(input)?;
            to_data(state.settings.get(&key).await?)
        }
        "settings.set" => {
            let input: SetSettingInput = parse_input(input)?;
            let entry = state.settings.set(input).await?;
            let details = json!({ "key": entry.key, "value": entry.value });
            audit(state, ctx, path, "config", Some(entry.id), details).await;
            to_data(entry)
        }
        "scenarios.list" => to_data(state.scenarios.list().await?),
        "scenarios.activate" => {
            let IdInput { id } = parse_input(input)?;
            let scenario = state.scenarios.activate(id).await?;
            audit(state, ctx, path, "demo_scenario", Some(scenario.id), json!({ "name": scenario.name })).await;
            to_data(SuccessResponse::ok())
        }
        "audit.list" => to_data(state.audit.list(parse_optional_input::<AuditFilter>(input)?).await?),
        _ => Err(unknown(path)),
    }
}
