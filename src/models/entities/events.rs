//! 安防事件实体
//!
//! 事件来源由 `source_type` + `source_id` 表示，
//! 取值为 camera / access_reader / sensor / wifi_access_point / system

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use crate::models::enums::{EventType, Severity};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub severity: Severity,
    #[sea_orm(nullable)]
    pub source_type: Option<String>,
    #[sea_orm(nullable)]
    pub source_id: Option<i32>,
    #[sea_orm(nullable)]
    pub building_id: Option<i32>,
    #[sea_orm(nullable)]
    pub floor_id: Option<i32>,
    #[sea_orm(nullable)]
    pub x: Option<f64>,
    #[sea_orm(nullable)]
    pub y: Option<f64>,
    #[sea_orm(nullable)]
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,
    #[sea_orm(nullable)]
    pub incident_id: Option<i32>,
    pub timestamp: DateTimeUtc,             // 事件发生时间
    pub created_at: DateTimeUtc,            // 入库时间
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
