//! 事件单服务

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde_json::json;
use crate::models::entities::{incidents, Incident};
use crate::models::enums::IncidentStatus;
use crate::models::structs::{
    effective_limit, CreateIncidentInput, IncidentFilter, IncidentStats, UpdateIncidentStatusInput,
    DEFAULT_INCIDENT_LIMIT,
};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::now_utc;
use super::{persistence, to_count};

#[derive(Clone)]
pub struct IncidentService {
    db: DatabaseHandle,
}

impl IncidentService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    pub async fn list_incidents(&self, filter: IncidentFilter) -> AppResult<Vec<Incident>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = incidents::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(incidents::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(incidents::Column::Priority.eq(priority));
        }
        query
            .order_by_desc(incidents::Column::CreatedAt)
            .order_by_desc(incidents::Column::Id)
            .limit(effective_limit(filter.limit, DEFAULT_INCIDENT_LIMIT))
            .all(conn)
            .await
            .map_err(persistence("加载事件单列表失败"))
    }

    pub async fn get_incident(&self, id: i32) -> AppResult<Option<Incident>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        incidents::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载事件单失败"))
    }

    /// 新建事件单，状态为 open，关联告警缺省为空数组
    pub async fn create_incident(&self, input: CreateIncidentInput) -> AppResult<Incident> {
        let conn = self.db.require()?;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::validation_error("Incident title is required"));
        }

        let linked_alert_ids = input.linked_alert_ids.unwrap_or_default();
        let incident = incidents::ActiveModel {
            status: Set(IncidentStatus::Open),
            priority: Set(input.priority),
            title: Set(title.to_string()),
            description: Set(input.description),
            building_id: Set(input.building_id),
            floor_id: Set(input.floor_id),
            linked_alert_ids: Set(Some(json!(linked_alert_ids))),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(persistence("保存事件单失败"))?;

        log::info!("新建事件单 {} [{}]: {}", incident.id, incident.priority, incident.title);
        Ok(incident)
    }

    /// 更新状态；resolved 记录解决时间，closed 记录关闭时间
    pub async fn update_incident_status(&self, input: UpdateIncidentStatusInput) -> AppResult<Incident> {
        let conn = self.db.require()?;

        let incident = incidents::Entity::find_by_id(input.id)
            .one(conn)
            .await
            .map_err(persistence("加载事件单失败"))?
            .ok_or_else(|| AppError::not_found_error("Incident", "Incident not found"))?;

        let now = now_utc();
        let mut active: incidents::ActiveModel = incident.into();
        active.status = Set(input.status);
        match input.status {
            IncidentStatus::Resolved => active.resolved_at = Set(Some(now)),
            IncidentStatus::Closed => active.closed_at = Set(Some(now)),
            _ => {}
        }

        let updated = active.update(conn).await.map_err(persistence("更新事件单状态失败"))?;
        log::info!("事件单 {} 状态更新为 {}", updated.id, updated.status);
        Ok(updated)
    }

    pub async fn incident_stats(&self) -> AppResult<IncidentStats> {
        let Some(conn) = self.db.connection() else {
            return Ok(IncidentStats::default());
        };

        let rows: Vec<(IncidentStatus, i64)> = incidents::Entity::find()
            .select_only()
            .column(incidents::Column::Status)
            .column_as(Expr::col(incidents::Column::Id).count(), "count")
            .group_by(incidents::Column::Status)
            .into_tuple()
            .all(conn)
            .await
            .map_err(persistence("统计事件单失败"))?;

        let mut stats = IncidentStats::default();
        for (status, count) in rows {
            let count = to_count(count);
            stats.total += count;
            match status {
                IncidentStatus::Open => stats.open += count,
                IncidentStatus::InProgress => stats.in_progress += count,
                IncidentStatus::Resolved => stats.resolved += count,
                IncidentStatus::Closed => stats.closed += count,
            }
        }
        Ok(stats)
    }
}
