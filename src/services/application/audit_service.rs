//! # 审计日志服务
//!
//! 写入审计日志失败不会影响原请求：只记录数据库失败日志

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use crate::models::entities::{audit_logs, AuditLog};
use crate::models::structs::{effective_limit, AuditFilter, AuditRecord, DEFAULT_AUDIT_LIMIT};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::AppResult;
use super::persistence;

#[derive(Clone)]
pub struct AuditService {
    db: DatabaseHandle,
}

impl AuditService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 追加一条审计日志，返回是否写入成功
    pub async fn record(&self, record: AuditRecord) -> bool {
        let Some(conn) = self.db.connection() else {
            return false;
        };

        let action = record.action.clone();
        let result = audit_logs::ActiveModel {
            user_id: Set(record.user_id),
            action: Set(record.action),
            entity_type: Set(record.entity_type),
            entity_id: Set(record.entity_id),
            details: Set(record.details),
            ip_address: Set(record.ip_address),
            ..Default::default()
        }
        .insert(conn)
        .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                crate::log_database_failure!("写入审计日志失败 ({}): {}", action, e);
                false
            }
        }
    }

    /// 审计日志，最新在前
    pub async fn list(&self, filter: AuditFilter) -> AppResult<Vec<AuditLog>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = audit_logs::Entity::find();
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(audit_logs::Column::EntityType.eq(entity_type));
        }
        query
            .order_by_desc(audit_logs::Column::Timestamp)
            .order_by_desc(audit_logs::Column::Id)
            .limit(effective_limit(filter.limit, DEFAULT_AUDIT_LIMIT))
            .all(conn)
            .await
            .map_err(persistence("加载审计日志失败"))
    }
}
