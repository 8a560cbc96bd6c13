use serde_json::{json, Value};
use super::{audit, unknown};
use crate::interfaces::http::context::RequestContext;
use crate::interfaces::http::rpc::{parse_input, parse_optional_input, to_data};
use crate::interfaces::http::state::AppState;
use crate::models::structs::{
    CameraFilter, CameraGridInput, EquipmentFilter, IdInput, SensorFilter, SuccessResponse,
    UpdateCameraStatusInput,
};
use crate::utils::error::AppResult;

pub(super) async fn call(
    state: &AppState,
    ctx: &mut RequestContext,
    path: &str,
    input: Value,
) -> AppResult<Value> {
    let equipment = &state.equipment;
    match path {
        "cameras.list" => to_data(equipment.list_cameras(parse_optional_input::<CameraFilter>(input)?).await?),
        "cameras.getById" => {
            let IdInput { id } = parse_input(input)?;
            to_data(equipment.get_camera(id).await?)
        }
        "cameras.updateStatus" => {
            let input: UpdateCameraStatusInput = parse_input(input)?;
            let camera = equipment.update_camera_status(input).await?;
            audit(state, ctx, path, "camera", Some(camera.id), json!({ "status": camera.status })).await;
            to_data(SuccessResponse::ok())
        }
        "cameras.stats" => to_data(equipment.camera_stats().await?),
        "cameras.grid" => to_data(equipment.camera_grid(parse_optional_input::<CameraGridInput>(input)?).await?),
        "sensors.list" => to_data(equipment.list_sensors(parse_optional_input::<SensorFilter>(input)?).await?),
        "accessReaders.list" => {
            to_data(equipment.list_access_readers(parse_optional_input::<EquipmentFilter>(input)?).await?)
        }
        "wifiAccessPoints.list" => {
            to_data(equipment.list_wifi_access_points(parse_optional_input::<EquipmentFilter>(input)?).await?)
        }
        _ => Err(unknown(path)),
    }
}
