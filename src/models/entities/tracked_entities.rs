//! 被追踪实体
//!
//! 记录人员/设备/车辆的最后已知位置。`last_*` 字段由定位事件写入时同步更新

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::models::enums::{EntityRole, EntityType, RiskLevel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracked_entities")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[sea_orm(nullable)]
    pub identifier_hash: Option<String>,    // 设备 MAC / 证件号的哈希
    #[sea_orm(nullable)]
    pub display_name: Option<String>,
    pub role: EntityRole,
    pub is_watchlist: bool,
    pub risk_score: i32,                    // 0..=100
    #[sea_orm(nullable)]
    pub last_seen_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub last_floor_id: Option<i32>,
    #[sea_orm(nullable)]
    pub last_x: Option<f64>,
    #[sea_orm(nullable)]
    pub last_y: Option<f64>,
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// 风险等级
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::location_events::Entity")]
    LocationEvents,
}

impl Related<super::location_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationEvents.def()
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
