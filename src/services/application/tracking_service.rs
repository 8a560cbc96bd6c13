//! # 人员追踪服务
//!
//! ## 业务说明
//! - 实体列表、详情与按角色统计
//! - 位置历史：最近 N 分钟内的定位事件（默认 30 分钟，按时间升序）
//! - 楼层当前位置：最后出现在该楼层且 5 分钟内有定位的实体
//! - 记录定位：写入定位事件并更新实体最后位置（同一事务）

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use crate::models::entities::{floors, location_events, tracked_entities, LocationEvent, TrackedEntity};
use crate::models::enums::EntityRole;
use crate::models::structs::{CurrentLocation, EntityFilter, EntityStats, LocationHistoryInput, RecordLocationInput};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::{minutes_ago, now_utc, ACTIVE_ENTITY_WINDOW_MINUTES, DEFAULT_HISTORY_MINUTES};
use super::{persistence, to_count};

/// 未提供置信度时使用的默认值
pub const DEFAULT_LOCATION_CONFIDENCE: f64 = 0.8;

#[derive(Clone)]
pub struct TrackingService {
    db: DatabaseHandle,
}

impl TrackingService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 实体列表，按最后出现时间倒序
    pub async fn list_entities(&self, filter: EntityFilter) -> AppResult<Vec<TrackedEntity>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let mut query = tracked_entities::Entity::find();
        if let Some(floor_id) = filter.floor_id {
            query = query.filter(tracked_entities::Column::LastFloorId.eq(floor_id));
        }
        if let Some(role) = filter.role {
            query = query.filter(tracked_entities::Column::Role.eq(role));
        }
        if let Some(is_watchlist) = filter.is_watchlist {
            query = query.filter(tracked_entities::Column::IsWatchlist.eq(is_watchlist));
        }
        query
            .order_by_desc(tracked_entities::Column::LastSeenAt)
            .order_by_asc(tracked_entities::Column::Id)
            .all(conn)
            .await
            .map_err(persistence("加载实体列表失败"))
    }

    pub async fn get_entity(&self, id: i32) -> AppResult<Option<TrackedEntity>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        tracked_entities::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(persistence("加载实体失败"))
    }

    /// 位置历史（升序）
    pub async fn location_history(&self, input: LocationHistoryInput) -> AppResult<Vec<LocationEvent>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let minutes = input.minutes.unwrap_or(DEFAULT_HISTORY_MINUTES).max(0);
        location_events::Entity::find()
            .filter(location_events::Column::EntityId.eq(input.entity_id))
            .filter(location_events::Column::Timestamp.gte(minutes_ago(minutes)))
            .order_by_asc(location_events::Column::Timestamp)
            .order_by_asc(location_events::Column::Id)
            .all(conn)
            .await
            .map_err(persistence("加载位置历史失败"))
    }

    /// 按角色统计；contractor 计入 unknown
    pub async fn entity_stats(&self) -> AppResult<EntityStats> {
        let Some(conn) = self.db.connection() else {
            return Ok(EntityStats::default());
        };

        let rows: Vec<(EntityRole, bool, i64)> = tracked_entities::Entity::find()
            .select_only()
            .column(tracked_entities::Column::Role)
            .column(tracked_entities::Column::IsWatchlist)
            .column_as(Expr::col(tracked_entities::Column::Id).count(), "count")
            .group_by(tracked_entities::Column::Role)
            .group_by(tracked_entities::Column::IsWatchlist)
            .into_tuple()
            .all(conn)
            .await
            .map_err(persistence("统计实体失败"))?;

        let mut stats = EntityStats::default();
        for (role, is_watchlist, count) in rows {
            let count = to_count(count);
            stats.total += count;
            if is_watchlist {
                stats.watchlist += count;
            }
            match role {
                EntityRole::Staff => stats.staff += count,
                EntityRole::Student => stats.students += count,
                EntityRole::Visitor => stats.visitors += count,
                EntityRole::Contractor | EntityRole::Unknown => stats.unknown += count,
            }
        }
        Ok(stats)
    }

    /// 楼层上 5 分钟内出现过的实体位置
    pub async fn current_locations(&self, floor_id: i32) -> AppResult<Vec<CurrentLocation>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };

        let entities = tracked_entities::Entity::find()
            .filter(tracked_entities::Column::LastFloorId.eq(floor_id))
            .filter(tracked_entities::Column::LastSeenAt.gte(minutes_ago(ACTIVE_ENTITY_WINDOW_MINUTES)))
            .order_by_desc(tracked_entities::Column::LastSeenAt)
            .all(conn)
            .await
            .map_err(persistence("加载楼层当前位置失败"))?;

        Ok(entities
            .into_iter()
            .map(|entity| CurrentLocation {
                entity_id: entity.id,
                display_name: entity.display_name,
                role: entity.role,
                is_watchlist: entity.is_watchlist,
                x: entity.last_x,
                y: entity.last_y,
                last_seen_at: entity.last_seen_at,
            })
            .collect())
    }

    /// 记录一次定位，返回新写入的定位事件
    pub async fn record_location(&self, input: RecordLocationInput) -> AppResult<LocationEvent> {
        let conn = self.db.require()?;

        let confidence = input.confidence.unwrap_or(DEFAULT_LOCATION_CONFIDENCE);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AppError::validation_error("confidence must be between 0 and 1"));
        }

        let txn = conn.begin().await.map_err(persistence("开启事务失败"))?;

        let entity = tracked_entities::Entity::find_by_id(input.entity_id)
            .one(&txn)
            .await
            .map_err(persistence("加载实体失败"))?
            .ok_or_else(|| AppError::not_found_error("TrackedEntity", "Entity not found"))?;
        floors::Entity::find_by_id(input.floor_id)
            .one(&txn)
            .await
            .map_err(persistence("加载楼层失败"))?
            .ok_or_else(|| AppError::not_found_error("Floor", "Floor not found"))?;

        let now = now_utc();
        let event = location_events::ActiveModel {
            entity_id: Set(input.entity_id),
            floor_id: Set(input.floor_id),
            source_type: Set(input.source_type),
            x: Set(input.x),
            y: Set(input.y),
            confidence: Set(confidence),
            timestamp: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(persistence("保存定位事件失败"))?;

        let mut active: tracked_entities::ActiveModel = entity.into();
        active.last_floor_id = Set(Some(input.floor_id));
        active.last_x = Set(Some(input.x));
        active.last_y = Set(Some(input.y));
        active.last_seen_at = Set(Some(now));
        active.update(&txn).await.map_err(persistence("更新实体位置失败"))?;

        txn.commit().await.map_err(persistence("提交事务失败"))?;
        log::debug!("实体 {} 定位: 楼层 {} ({:.1}, {:.1})", input.entity_id, input.floor_id, input.x, input.y);
        Ok(event)
    }
}
