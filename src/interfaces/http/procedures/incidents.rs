use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{
    CreateIncidentInput, IdInput, IncidentFilter, SuccessResponse, UpdateIncidentStatusInput,
};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let incidents = &state.incidents;
    match path {
        "incidents.list" => to_data(incidents.list_incidents(parse_optional_input::<IncidentFilter>(input)?).await?),
        "incidents.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(incidents.get_incident(id).await?)
        }
        "incidents.create" => {
            let input: CreateIncidentInput = parse_input(input)?;
            let incident = incidents.create_incident(input).await?;
            let details = json!({ "title": incident.title, "priority": incident.priority });
            audit(state, ctx, path, "incident", Some(incident.id), details).await;
            to_data(incident)
        }
        "incidents.updateStatus" => {
            let input: UpdateIncidentStatusInput = parse_input(input)?;
            let incident = incidents.update_incident_status(input).await?;
            audit(state, ctx, path, "incident", Some(incident.id), json!({ "status": incident.status })).await;
            to_data(SuccessResponse::ok())
        }
        "incidents.stats" => to_data(incidents.incident_stats().await?),
        _ => Err(unknown(path)),
    }
}
