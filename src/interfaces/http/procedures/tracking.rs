use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{
    EntityFilter, FloorIdInput, IdInput, LocationHistoryInput, RecordLocationInput, SuccessResponse,
};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let tracking = &state.tracking;
    match path {
        "entities.list" => to_data(tracking.list_entities(parse_optional_input::<EntityFilter>(input)?).await?),
        "entities.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(tracking.get_entity(id).await?)
        }
        "entities.getLocationHistory" => {
            let input: LocationHistoryInput = parse_input(input)?;
            to_data(tracking.location_history(input).await?)
        }
        "entities.stats" => to_data(tracking.entity_stats().await?),
        "locations.current" => {
            let FloorIdInput { floor_id } = parse_input(input)?;
            to_data(tracking.current_locations(floor_id).await?)
        }
        "locations.record" => {
            let input: RecordLocationInput = parse_input(input)?;
            let event = tracking.record_location(input).await?;
            let details = json!({
                "entityId": event.entity_id,
                "floorId": event.floor_id,
                "x": event.x,
                "y": event.y,
            });
            audit(state, ctx, path, "location_event", Some(event.id), details).await;
            to_data(SuccessResponse::ok())
        }
        _ => Err(unknown(path)),
    }
}
