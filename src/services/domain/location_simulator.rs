//! # 位置模拟器
//!
//! ## 业务说明
//! 演示环境没有真实的定位源，模拟器周期性地让已在楼层上的实体随机游走，
//! 并按 `locations.record` 的语义写入定位事件（来源 wifi）
//!
//! ## 运动模型
//! - 每个坐标轴随机移动 ±speed·Δt
//! - x 限制在 [50, 1150]，y 限制在 [50, 750]
//! - 没有位置或位置不在楼层平面内的实体，在楼层中间 80% 区域内随机取起点
//! - 越出楼层平面的一步作废，实体本次停留原地
//!
//! 楼层平面尺寸取楼层记录的 floorplan 宽高，缺失时使用 `simulation.floor_width` / `floor_height`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use crate::models::entities::{floors, tracked_entities, Floor};
use crate::models::enums::LocationSource;
use crate::models::structs::RecordLocationInput;
use crate::services::application::TrackingService;
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::config::SimulationConfig;
use crate::utils::error::{AppError, AppResult};

/// 默认移动速度（像素/毫秒）
pub const DEFAULT_SPEED: f64 = 0.05;

/// 随机游走的坐标边界
pub const MIN_X: f64 = 50.0;
pub const MAX_X: f64 = 1150.0;
pub const MIN_Y: f64 = 50.0;
pub const MAX_Y: f64 = 750.0;

/// 没有历史位置时的出发点
pub const START_POSITION: Position = Position { x: 500.0, y: 400.0 };

/// 模拟定位的置信度范围
const CONFIDENCE_RANGE: std::ops::RangeInclusive<f64> = 0.6..=0.99;

/// 平面坐标（像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 楼层平面尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorBounds {
    pub width: f64,
    pub height: f64,
}

impl FloorBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 取楼层平面图尺寸，缺失或非正数的一边使用 `fallback`
    pub fn from_floor(floor: &Floor, fallback: FloorBounds) -> Self {
        let width = floor
            .floorplan_width
            .filter(|w| *w > 0)
            .map_or(fallback.width, f64::from);
        let height = floor
            .floorplan_height
            .filter(|h| *h > 0)
            .map_or(fallback.height, f64::from);
        Self { width, height }
    }

    /// 点是否位于平面内（含边界）
    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// 在楼层中间 80% 的区域内均匀取一个随机位置
pub fn generate_random_position<R: Rng + ?Sized>(rng: &mut R, bounds: FloorBounds) -> Position {
    Position {
        x: rng.gen::<f64>() * bounds.width * 0.8 + bounds.width * 0.1,
        y: rng.gen::<f64>() * bounds.height * 0.8 + bounds.height * 0.1,
    }
}

/// 随机游走一步
pub fn simulate_entity_movement<R: Rng + ?Sized>(
    rng: &mut R,
    current: Option<Position>,
    delta_ms: f64,
    speed: f64,
) -> Position {
    let current = current.unwrap_or(START_POSITION);
    let max_move = speed * delta_ms;

    let x = current.x + (rng.gen::<f64>() - 0.5) * max_move * 2.0;
    let y = current.y + (rng.gen::<f64>() - 0.5) * max_move * 2.0;

    Position {
        x: x.clamp(MIN_X, MAX_X),
        y: y.clamp(MIN_Y, MAX_Y),
    }
}

/// 欧氏距离
pub fn distance(a: Position, b: Position) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// 后台位置模拟器
#[derive(Clone)]
pub struct LocationSimulator {
    db: DatabaseHandle,
    tracking: TrackingService,
    config: SimulationConfig,
}

impl LocationSimulator {
    pub fn new(db: DatabaseHandle, config: SimulationConfig) -> Self {
        let tracking = TrackingService::new(db.clone());
        Self { db, tracking, config }
    }

    /// 配置中的楼层平面尺寸
    pub fn default_bounds(&self) -> FloorBounds {
        FloorBounds::new(self.config.floor_width, self.config.floor_height)
    }

    /// 计算实体下一步的位置
    fn next_position<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current: Option<Position>,
        bounds: FloorBounds,
        delta_ms: f64,
    ) -> Position {
        match current {
            Some(current) if bounds.contains(current) => {
                let next = simulate_entity_movement(rng, Some(current), delta_ms, self.config.speed);
                if bounds.contains(next) {
                    next
                } else {
                    current
                }
            }
            _ => generate_random_position(rng, bounds),
        }
    }

    /// 执行一次模拟步进，返回本次移动的实体数量
    ///
    /// 最久未更新的实体优先移动；单个实体写入失败只记录日志
    pub async fn tick(&self, delta_ms: f64) -> AppResult<usize> {
        let conn = self.db.require()?;

        let entities = tracked_entities::Entity::find()
            .filter(tracked_entities::Column::LastFloorId.is_not_null())
            .order_by_asc(tracked_entities::Column::LastSeenAt)
            .limit(self.config.entity_batch_size)
            .all(conn)
            .await
            .map_err(|e| AppError::persistence_error(format!("加载待模拟实体失败: {}", e)))?;

        let floor_ids: Vec<i32> = entities.iter().filter_map(|e| e.last_floor_id).collect();
        let fallback = self.default_bounds();
        let bounds_by_floor: HashMap<i32, FloorBounds> = floors::Entity::find()
            .filter(floors::Column::Id.is_in(floor_ids))
            .all(conn)
            .await
            .map_err(|e| AppError::persistence_error(format!("加载楼层尺寸失败: {}", e)))?
            .iter()
            .map(|floor| (floor.id, FloorBounds::from_floor(floor, fallback)))
            .collect();

        let moves: Vec<(RecordLocationInput, f64)> = {
            let mut rng = StdRng::from_entropy();
            entities
                .iter()
                .filter_map(|entity| {
                    let floor_id = entity.last_floor_id?;
                    let bounds = bounds_by_floor.get(&floor_id).copied().unwrap_or(fallback);
                    let current = match (entity.last_x, entity.last_y) {
                        (Some(x), Some(y)) => Some(Position::new(x, y)),
                        _ => None,
                    };
                    let next = self.next_position(&mut rng, current, bounds, delta_ms);
                    let step = current.map_or(0.0, |c| distance(c, next));
                    let input = RecordLocationInput {
                        entity_id: entity.id,
                        floor_id,
                        source_type: LocationSource::Wifi,
                        x: next.x,
                        y: next.y,
                        confidence: Some(rng.gen_range(CONFIDENCE_RANGE)),
                    };
                    Some((input, step))
                })
                .collect()
        };

        let mut moved = 0;
        let mut travelled = 0.0;
        for (input, step) in moves {
            let entity_id = input.entity_id;
            match self.tracking.record_location(input).await {
                Ok(_) => {
                    moved += 1;
                    travelled += step;
                }
                Err(e) => log::warn!("⚠️ [SIMULATOR] 实体 {} 定位写入失败: {}", entity_id, e),
            }
        }
        log::trace!("[SIMULATOR] 本次总位移 {:.1}px", travelled);
        Ok(moved)
    }

    /// 启动后台任务，直到取消令牌被触发
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = Duration::from_millis(self.config.tick_interval_ms.max(1));
            let mut ticker = interval(period);
            let mut last_tick = Instant::now();

            log::info!(
                "🔧 [SIMULATOR] 位置模拟已启动 (间隔 {}ms, 每批 {} 个实体)",
                self.config.tick_interval_ms,
                self.config.entity_batch_size
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        log::info!("🛑 [SIMULATOR] 位置模拟已停止");
                        break;
                    }
                    _ = ticker.tick() => {
                        let delta_ms = last_tick.elapsed().as_secs_f64() * 1000.0;
                        last_tick = Instant::now();
                        match self.tick(delta_ms).await {
                            Ok(moved) => log::debug!("[SIMULATOR] 本次移动 {} 个实体", moved),
                            Err(e) => log::error!("❌ [SIMULATOR] 模拟步进失败: {}", e),
                        }
                    }
                }
            }
        })
    }
}
