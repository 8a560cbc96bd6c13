//! # 设备服务
//!
//! 摄像头、传感器、门禁读卡器、无线AP 的查询，以及摄像头状态维护、统计和网格分页

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use crate::models::entities::{
    access_readers, cameras, sensors, wifi_access_points, AccessReader, Camera, Sensor,
    WifiAccessPoint,
};
use crate::models::enums::EquipmentStatus;
use crate::models::structs::{
    page_count, CameraFilter, CameraGridInput, CameraGridPage, CameraStats, EquipmentFilter,
    SensorFilter, UpdateCameraStatusInput,
};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use super::{persistence, to_count};

#[derive(Clone)]
pub struct EquipmentService {
    db: DatabaseHandle,
}

/// 摄像头过滤条件（AND），按名称排序
fn camera_query(filter: &CameraFilter) -> Select<cameras::Entity> {
    let mut query = cameras::Entity::find();
    if let Some(building_id) = filter.building_id {
        query = query.filter(cameras::Column::BuildingId.eq(building_id));
    }
    if let Some(floor_id) = filter.floor_id {
        query = query.filter(cameras::Column::FloorId.eq(floor_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(cameras::Column::Status.eq(status));
    }
    query.order_by_asc(cameras::Column::Name).order_by_asc(cameras::Column::Id)
}

impl EquipmentService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    // ==================== 摄像头 ====================

    pub async fn list_cameras(&self, filter: CameraFilter) -> AppResult<Vec<Camera>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };
        camera_query(&filter)
            .all(conn)
            .await
            .map_err(persistence("加载摄像头列表失败"))
    }

    pub async fn get_camera(&self, id: i32) -> AppResult<Option<Camera>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        cameras::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载摄像头失败"))
    }

    /// 更新摄像头状态并刷新 updatedAt
    pub async fn update_camera_status(&self, input: UpdateCameraStatusInput) -> AppResult<Camera> {
        let conn = self.db.require()?;

        let camera = cameras::Entity::find_by_id(input.id)
            .one(conn)
            .await
            .map_err(persistence("加载摄像头失败"))?
            .ok_or_else(|| AppError::not_found_error("Camera", "Camera not found"))?;

        let previous = camera.status;
        let mut active: cameras::ActiveModel = camera.into();
        active.status = Set(input.status);
        let updated = active.update(conn).await.map_err(persistence("更新摄像头状态失败"))?;

        log::info!("摄像头 {} 状态变更: {} -> {}", updated.name, previous, updated.status);
        Ok(updated)
    }

    /// 按状态分组统计
    pub async fn camera_stats(&self) -> AppResult<CameraStats> {
        let Some(conn) = self.db.connection() else {
            return Ok(CameraStats::default());
        };

        let rows: Vec<(EquipmentStatus, i64)> = cameras::Entity::find()
            .select_only()
            .column(cameras::Column::Status)
            .column_as(Expr::col(cameras::Column::Id).count(), "count")
            .group_by(cameras::Column::Status)
            .into_tuple()
            .all(conn)
            .await
            .map_err(persistence("统计摄像头状态失败"))?;

        let mut stats = CameraStats::default();
        for (status, count) in rows {
            let count = to_count(count);
            stats.total += count;
            match status {
                EquipmentStatus::Online => stats.online += count,
                EquipmentStatus::Offline => stats.offline += count,
                EquipmentStatus::Maintenance => stats.maintenance += count,
                EquipmentStatus::Error => stats.error += count,
            }
        }
        Ok(stats)
    }

    /// 摄像头网格分页
    pub async fn camera_grid(&self, input: CameraGridInput) -> AppResult<CameraGridPage> {
        let (page, page_size) = input.normalized();
        let Some(conn) = self.db.connection() else {
            return Ok(CameraGridPage::empty(page, page_size));
        };

        let paginator = camera_query(&input.filter).paginate(conn, page_size);
        let total = paginator.num_items().await.map_err(persistence("统计摄像头数量失败"))?;
        let page_count = page_count(total, page_size);

        // 超出末页时不再查询，直接返回空列表
        let cameras = if page > page_count {
            Vec::new()
        } else {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(persistence("加载摄像头分页失败"))?
        };

        Ok(CameraGridPage {
            cameras,
            page,
            page_size,
            page_count,
            total,
        })
    }

    // ==================== 其他设备 ====================

    pub async fn list_sensors(&self, filter: SensorFilter) -> AppResult<Vec<Sensor>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = sensors::Entity::find();
        if let Some(building_id) = filter.building_id {
            query = query.filter(sensors::Column::BuildingId.eq(building_id));
        }
        if let Some(floor_id) = filter.floor_id {
            query = query.filter(sensors::Column::FloorId.eq(floor_id));
        }
        if let Some(sensor_type) = filter.sensor_type {
            query = query.filter(sensors::Column::SensorType.eq(sensor_type));
        }
        query
            .order_by_asc(sensors::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载传感器列表失败"))
    }

    pub async fn list_access_readers(&self, filter: EquipmentFilter) -> AppResult<Vec<AccessReader>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = access_readers::Entity::find();
        if let Some(building_id) = filter.building_id {
            query = query.filter(access_readers::Column::BuildingId.eq(building_id));
        }
        if let Some(floor_id) = filter.floor_id {
            query = query.filter(access_readers::Column::FloorId.eq(floor_id));
        }
        query
            .order_by_asc(access_readers::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载门禁读卡器列表失败"))
    }

    pub async fn list_wifi_access_points(&self, filter: EquipmentFilter) -> AppResult<Vec<WifiAccessPoint>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = wifi_access_points::Entity::find();
        if let Some(building_id) = filter.building_id {
            query = query.filter(wifi_access_points::Column::BuildingId.eq(building_id));
        }
        if let Some(floor_id) = filter.floor_id {
            query = query.filter(wifi_access_points::Column::FloorId.eq(floor_id));
        }
        query
            .order_by_asc(wifi_access_points::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载无线AP列表失败"))
    }
}
