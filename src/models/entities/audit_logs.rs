//! 审计日志实体

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use chrono::Utc;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub user_id: Option<i32>,
    pub action: String,                     // RPC 过程路径，如 alerts.updateStatus
    #[sea_orm(nullable)]
    pub entity_type: Option<String>,
    #[sea_orm(nullable)]
    pub entity_id: Option<i32>,
    #[sea_orm(column_type = "Json", nullable)]
    pub details: Option<Json>,
    #[sea_orm(nullable)]
    pub ip_address: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            self.timestamp = Set(Utc::now());
        }
        Ok(self)
    }
}
