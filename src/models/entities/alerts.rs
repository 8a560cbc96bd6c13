//! 告警实体

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::models::enums::{AlertSeverity, AlertStatus, AlertType};

/// 告警
///
/// 状态流转: active → acknowledged / investigating → resolved / false_alarm
/// 确认与解决时分别记录操作人与时间
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub building_id: Option<i32>,
    #[sea_orm(nullable)]
    pub floor_id: Option<i32>,
    #[sea_orm(nullable)]
    pub x: Option<f64>,
    #[sea_orm(nullable)]
    pub y: Option<f64>,
    #[sea_orm(nullable)]
    pub ai_confidence: Option<f64>,
    #[sea_orm(nullable)]
    pub source_event_id: Option<i32>,
    #[sea_orm(nullable)]
    pub assigned_to: Option<i32>,
    #[sea_orm(nullable)]
    pub acknowledged_by: Option<i32>,
    #[sea_orm(nullable)]
    pub acknowledged_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub resolved_by: Option<i32>,
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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
