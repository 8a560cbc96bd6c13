//! 定位事件实体（实体位置历史）

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use crate::models::enums::LocationSource;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location_events")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entity_id: i32,
    pub floor_id: i32,
    pub source_type: LocationSource,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,                    // 0..=1，默认 0.8
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tracked_entities::Entity",
        from = "Column::EntityId",
        to = "super::tracked_entities::Column::Id"
    )]
    TrackedEntity,
    #[sea_orm(
        belongs_to = "super::floors::Entity",
        from = "Column::FloorId",
        to = "super::floors::Column::Id"
    )]
    Floor,
}

impl Related<super::tracked_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackedEntity.def()
    }
}

impl Related<super::floors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
