use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{AlertFilter, CreateAlertInput, IdInput, SuccessResponse, UpdateAlertStatusInput};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let alerts = &state.alerts;
    match path {
        "alerts.list" => to_data(alerts.list_alerts(parse_optional_input::<AlertFilter>(input)?).await?),
        "alerts.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(alerts.get_alert(id).await?)
        }
        "alerts.updateStatus" => {
            let input: UpdateAlertStatusInput = parse_input(input)?;
            let alert = alerts.update_alert_status(input, ctx.user_id()).await?;
            let details = json!({
                "status": alert.status,
                "resolutionNotes": alert.resolution_notes,
            });
            audit(state, ctx, path, "alert", Some(alert.id), details).await;
            to_data(SuccessResponse::ok())
        }
        "alerts.create" => {
            let input: CreateAlertInput = parse_input(input)?;
            let alert = alerts.create_alert(input).await?;
            let details = json!({
                "type": alert.alert_type,
                "severity": alert.severity,
                "title": alert.title,
            });
            audit(state, ctx, path, "alert", Some(alert.id), details).await;
            to_data(alert)
        }
        "alerts.stats" => to_data(alerts.alert_stats().await?),
        _ => Err(unknown(path)),
    }
}
