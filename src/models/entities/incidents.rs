//! 事件单实体
//!
//! `linked_*_ids` 为 JSON 整数数组，`timeline` 为 JSON 对象数组

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::models::enums::{IncidentPriority, IncidentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub building_id: Option<i32>,
    #[sea_orm(nullable)]
    pub floor_id: Option<i32>,
    #[sea_orm(nullable)]
    pub commander_id: Option<i32>,
    #[sea_orm(nullable)]
    pub assigned_to: Option<i32>,
    #[sea_orm(column_type = "Json", nullable)]
    pub tags: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub timeline: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub linked_alert_ids: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub linked_event_ids: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub linked_entity_ids: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub closed_at: Option<DateTimeUtc>,
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
