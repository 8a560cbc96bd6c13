use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{CreateBuildingInput, FloorFilter, FloorIdInput, IdInput};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let campus = &state.campus;
    match path {
        "buildings.list" => to_data(campus.list_buildings().await?),
        "buildings.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(campus.get_building(id).await?)
        }
        "buildings.create" => {
            let input: CreateBuildingInput = parse_input(input)?;
            let building = campus.create_building(input).await?;
            audit(state, ctx, path, "building", Some(building.id), json!({ "name": building.name })).await;
            to_data(building)
        }
        "floors.list" => to_data(campus.list_floors(parse_optional_input::<FloorFilter>(input)?).await?),
        "floors.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(campus.get_floor(id).await?)
        }
        "zones.list" => {
            let FloorIdInput { floor_id } = parse_input(input)?;
            to_data(campus.list_zones(floor_id).await?)
        }
        _ => Err(unknown(path)),
    }
}
