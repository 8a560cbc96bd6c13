//! 摄像头实体

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::models::enums::{CameraType, EquipmentStatus};

/// 摄像头
///
/// 位置 (x, y) 以楼层平面图像素为单位；`has_ai` 表示是否启用 AI 分析
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cameras")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub building_id: i32,
    #[sea_orm(nullable)]
    pub floor_id: Option<i32>,
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    #[sea_orm(column_type = "Text", nullable)]
    pub rtsp_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub hls_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub snapshot_url: Option<String>,
    #[sea_orm(nullable)]
    pub x: Option<f64>,
    #[sea_orm(nullable)]
    pub y: Option<f64>,
    pub fov_degrees: i32,                   // 视场角，默认 90
    pub rotation: i32,                      // 朝向角，默认 0
    pub status: EquipmentStatus,
    #[serde(rename = "hasAI")]
    pub has_ai: bool,
    #[sea_orm(nullable)]
    pub last_health_check: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buildings::Entity",
        from = "Column::BuildingId",
        to = "super::buildings::Column::Id"
    )]
    Building,
}

impl Related<super::buildings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
