//! 事件流查询

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use crate::models::entities::{events, Event};
use crate::models::structs::{effective_limit, EventFilter, DEFAULT_EVENT_LIMIT};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::AppResult;
use super::persistence;

#[derive(Clone)]
pub struct EventService {
    db: DatabaseHandle,
}

impl EventService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 事件列表，按发生时间倒序
    ///
    /// 无法识别的 `type` 不参与过滤
    pub async fn list_events(&self, filter: EventFilter) -> AppResult<Vec<Event>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = events::Entity::find();
        match (filter.event_type.as_deref(), filter.parsed_type()) {
            (_, Some(event_type)) => query = query.filter(events::Column::EventType.eq(event_type)),
            (Some(raw), None) => log::debug!("忽略无法识别的事件类型过滤条件: {}", raw),
            (None, None) => {}
        }
        if let Some(severity) = filter.severity {
            query = query.filter(events::Column::Severity.eq(severity));
        }
        if let Some(building_id) = filter.building_id {
            query = query.filter(events::Column::BuildingId.eq(building_id));
        }
        if let Some(floor_id) = filter.floor_id {
            query = query.filter(events::Column::FloorId.eq(floor_id));
        }

        query
            .order_by_desc(events::Column::Timestamp)
            .order_by_desc(events::Column::Id)
            .limit(effective_limit(filter.limit, DEFAULT_EVENT_LIMIT))
            .all(conn)
            .await
            .map_err(persistence("加载事件列表失败"))
    }
}
