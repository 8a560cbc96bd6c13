//! # 仪表盘总览
//!
//! 各项计数互不依赖，通过 `tokio::try_join!` 并发查询：
//! - 活跃实体：5 分钟内出现过
//! - 近期事件：60 分钟内发生
//! - 严重告警：active 且 critical
//! - 未结事件单：open 或 in_progress

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use crate::models::entities::{alerts, cameras, events, incidents, tracked_entities};
use crate::models::enums::{AlertSeverity, AlertStatus, EquipmentStatus, IncidentStatus};
use crate::models::structs::{online_percent, DashboardOverview};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::AppResult;
use crate::utils::time_utils::{minutes_ago, ACTIVE_ENTITY_WINDOW_MINUTES, RECENT_EVENT_WINDOW_MINUTES};
use super::persistence;

#[derive(Clone)]
pub struct DashboardService {
    db: DatabaseHandle,
}

impl DashboardService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    pub async fn overview(&self) -> AppResult<DashboardOverview> {
        let Some(conn) = self.db.connection() else {
            return Ok(DashboardOverview::default());
        };

        let (total_cameras, cameras_online, active_alerts, critical_alerts, open_incidents, tracked, recent_events) = tokio::try_join!(
            cameras::Entity::find().count(conn),
            cameras::Entity::find()
                .filter(cameras::Column::Status.eq(EquipmentStatus::Online))
                .count(conn),
            alerts::Entity::find()
                .filter(alerts::Column::Status.eq(AlertStatus::Active))
                .count(conn),
            alerts::Entity::find()
                .filter(alerts::Column::Status.eq(AlertStatus::Active))
                .filter(alerts::Column::Severity.eq(AlertSeverity::Critical))
                .count(conn),
            incidents::Entity::find()
                .filter(incidents::Column::Status.is_in([IncidentStatus::Open, IncidentStatus::InProgress]))
                .count(conn),
            tracked_entities::Entity::find()
                .filter(tracked_entities::Column::LastSeenAt.gte(minutes_ago(ACTIVE_ENTITY_WINDOW_MINUTES)))
                .count(conn),
            events::Entity::find()
                .filter(events::Column::Timestamp.gte(minutes_ago(RECENT_EVENT_WINDOW_MINUTES)))
                .count(conn),
        )
        .map_err(persistence("统计仪表盘总览失败"))?;

        Ok(DashboardOverview {
            total_cameras,
            cameras_online,
            cameras_online_percent: online_percent(cameras_online, total_cameras),
            active_alerts,
            critical_alerts,
            open_incidents,
            tracked_entities: tracked,
            recent_events,
        })
    }
}
