//! 校园结构服务：建筑、楼层、区域

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use crate::models::entities::{buildings, floors, zones, Building, Floor, Zone};
use crate::models::structs::{CreateBuildingInput, FloorFilter};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use super::persistence;

#[derive(Clone)]
pub struct CampusService {
    db: DatabaseHandle,
}

impl CampusService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 所有建筑，按名称排序
    pub async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };
        buildings::Entity::find()
            .order_by_asc(buildings::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载建筑列表失败"))
    }

    pub async fn get_building(&self, id: i32) -> AppResult<Option<Building>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        buildings::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载建筑失败"))
    }

    /// 新建建筑，floorsCount 缺省为 1
    pub async fn create_building(&self, input: CreateBuildingInput) -> AppResult<Building> {
        let conn = self.db.require()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation_error("Building name is required"));
        }
        let floors_count = input.floors_count.unwrap_or(1);
        if floors_count < 0 {
            return Err(AppError::validation_error("floorsCount cannot be negative"));
        }

        let active = buildings::ActiveModel {
            name: Set(name.to_string()),
            code: Set(input.code),
            address: Set(input.address),
            floors_count: Set(floors_count),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            description: Set(input.description),
            image_url: Set(input.image_url),
            ..Default::default()
        };
        let building = active.insert(conn).await.map_err(persistence("保存建筑失败"))?;
        log::info!("新建建筑: {} (id={})", building.name, building.id);
        Ok(building)
    }

    /// 楼层列表：指定建筑时按层号排序，否则按建筑、层号排序
    pub async fn list_floors(&self, filter: FloorFilter) -> AppResult<Vec<Floor>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let query = match filter.building_id {
            Some(building_id) => floors::Entity::find()
                .filter(floors::Column::BuildingId.eq(building_id))
                .order_by_asc(floors::Column::Level),
            None => floors::Entity::find()
                .order_by_asc(floors::Column::BuildingId)
                .order_by_asc(floors::Column::Level),
        };
        query.all(conn).await.map_err(persistence("加载楼层列表失败"))
    }

    pub async fn get_floor(&self, id: i32) -> AppResult<Option<Floor>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        floors::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载楼层失败"))
    }

    /// 楼层内的区域，按名称排序
    pub async fn list_zones(&self, floor_id: i32) -> AppResult<Vec<Zone>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };
        zones::Entity::find()
            .filter(zones::Column::FloorId.eq(floor_id))
            .order_by_asc(zones::Column::Name)
            .all(conn)
            .await
            .map_err(persistence("加载区域列表失败"))
    }
}
