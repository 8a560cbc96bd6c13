//! # 告警服务
//!
//! ## 状态流转
//! - `acknowledged`: 记录确认人与确认时间
//! - `resolved` / `false_alarm`: 记录处理人、处理时间，有备注时写入处理备注
//! - 其他状态只更新状态本身

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use crate::models::entities::{alerts, Alert};
use crate::models::enums::{AlertSeverity, AlertStatus};
use crate::models::structs::{
    effective_limit, AlertFilter, AlertStats, CreateAlertInput, UpdateAlertStatusInput,
    DEFAULT_ALERT_LIMIT,
};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::now_utc;
use super::{persistence, to_count};

#[derive(Clone)]
pub struct AlertService {
    db: DatabaseHandle,
}

impl AlertService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 告警列表，按创建时间倒序
    pub async fn list_alerts(&self, filter: AlertFilter) -> AppResult<Vec<Alert>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = alerts::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(alerts::Column::Status.eq(status));
        }
        if let Some(severity) = filter.severity {
            query = query.filter(alerts::Column::Severity.eq(severity));
        }
        if let Some(alert_type) = filter.alert_type {
            query = query.filter(alerts::Column::AlertType.eq(alert_type));
        }
        query
            .order_by_desc(alerts::Column::CreatedAt)
            .order_by_desc(alerts::Column::Id)
            .limit(effective_limit(filter.limit, DEFAULT_ALERT_LIMIT))
            .all(conn)
            .await
            .map_err(persistence("加载告警列表失败"))
    }

    pub async fn get_alert(&self, id: i32) -> AppResult<Option<Alert>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        alerts::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载告警失败"))
    }

    /// 更新告警状态，`user_id` 为当前操作人
    pub async fn update_alert_status(&self, input: UpdateAlertStatusInput, user_id: Option<i32>) -> AppResult<Alert> {
        let conn = self.db.require()?;

        let alert = alerts::Entity::find_by_id(input.id)
            .one(conn)
            .await
            .map_err(persistence("加载告警失败"))?
            .ok_or_else(|| AppError::not_found_error("Alert", "Alert not found"))?;

        let now = now_utc();
        let mut active: alerts::ActiveModel = alert.into();
        active.status = Set(input.status);
        match input.status {
            AlertStatus::Acknowledged => {
                active.acknowledged_by = Set(user_id);
                active.acknowledged_at = Set(Some(now));
            }
            status if status.is_terminal() => {
                active.resolved_by = Set(user_id);
                active.resolved_at = Set(Some(now));
                if let Some(notes) = input.resolution_notes {
                    active.resolution_notes = Set(Some(notes));
                }
            }
            _ => {}
        }

        let updated = active.update(conn).await.map_err(persistence("更新告警状态失败"))?;
        log::info!("告警 {} 状态更新为 {}", updated.id, updated.status);
        Ok(updated)
    }

    /// 新建告警，状态为 active
    pub async fn create_alert(&self, input: CreateAlertInput) -> AppResult<Alert> {
        let conn = self.db.require()?;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::validation_error("Alert title is required"));
        }
        if let Some(confidence) = input.ai_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(AppError::validation_error("aiConfidence must be between 0 and 1"));
            }
        }

        let alert = alerts::ActiveModel {
            alert_type: Set(input.alert_type),
            severity: Set(input.severity),
            status: Set(AlertStatus::Active),
            title: Set(title.to_string()),
            description: Set(input.description),
            building_id: Set(input.building_id),
            floor_id: Set(input.floor_id),
            x: Set(input.x),
            y: Set(input.y),
            ai_confidence: Set(input.ai_confidence),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(persistence("保存告警失败"))?;

        log::warn!("新告警 [{}] {}: {}", alert.severity, alert.alert_type, alert.title);
        Ok(alert)
    }

    /// 告警统计；严重程度计数只统计 active 告警
    pub async fn alert_stats(&self) -> AppResult<AlertStats> {
        let Some(conn) = self.db.connection() else {
            return Ok(AlertStats::default());
        };

        let rows: Vec<(AlertStatus, AlertSeverity, i64)> = alerts::Entity::find()
            .select_only()
            .column(alerts::Column::Status)
            .column(alerts::Column::Severity)
            .column_as(Expr::col(alerts::Column::Id).count(), "count")
            .group_by(alerts::Column::Status)
            .group_by(alerts::Column::Severity)
            .into_tuple()
            .all(conn)
            .await
            .map_err(persistence("统计告警失败"))?;

        let mut stats = AlertStats::default();
        for (status, severity, count) in rows {
            let count = to_count(count);
            stats.total += count;
            if status != AlertStatus::Active {
                continue;
            }
            stats.active += count;
            match severity {
                AlertSeverity::Critical => stats.critical += count,
                AlertSeverity::High => stats.high += count,
                AlertSeverity::Medium => stats.medium += count,
                AlertSeverity::Low => stats.low += count,
            }
        }
        Ok(stats)
    }
}
