//! # 演示数据生成
//!
//! ## 业务说明
//! 为布朗大学校园生成一套完整的演示数据：建筑、楼层、各类设备、人员、告警、事件单与事件流
//!
//! ## 执行流程
//! 1. 在同一个事务中先按子表优先的顺序清空旧的演示数据
//! 2. 逐条写入建筑与楼层（后续数据需要它们的主键）
//! 3. 其余数据在内存中生成后分批写入
//!
//! 给定相同的随机种子时，生成结果（除时间戳外）完全一致

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use crate::models::entities::{
    access_readers, alerts, buildings, cameras, events, floors, incidents, sensors,
    tracked_entities, wifi_access_points, Building, Floor,
};
use crate::models::enums::*;
use crate::services::infrastructure::database::clear_demo_data;
use crate::utils::error::{AppError, AppResult};

/// 批量写入的每批行数
const INSERT_CHUNK_SIZE: usize = 100;

/// 每栋建筑最多生成的楼层数
pub const MAX_SEEDED_FLOORS: i32 = 4;

pub const FLOORPLAN_WIDTH: i32 = 1200;
pub const FLOORPLAN_HEIGHT: i32 = 800;
pub const FLOORPLAN_SCALE: f64 = 10.0;

/// 建筑种子数据
#[derive(Debug, Clone, Copy)]
pub struct BuildingSeed {
    pub name: &'static str,
    pub code: &'static str,
    pub address: &'static str,
    pub floors_count: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: &'static str,
}

pub const BUILDINGS: [BuildingSeed; 10] = [
    BuildingSeed { name: "Barus & Holley", code: "BH", address: "184 Hope St", floors_count: 4, latitude: 41.8268, longitude: -71.4025, description: "Engineering building with labs and classrooms" },
    BuildingSeed { name: "Sciences Library (SciLi)", code: "SL", address: "210 Thayer St", floors_count: 14, latitude: 41.8272, longitude: -71.4003, description: "Main science library, iconic brutalist tower" },
    BuildingSeed { name: "Keeney Quadrangle", code: "KQ", address: "45 Charlesfield St", floors_count: 4, latitude: 41.8235, longitude: -71.4012, description: "Freshman dormitory complex" },
    BuildingSeed { name: "Faunce House", code: "FH", address: "75 Waterman St", floors_count: 3, latitude: 41.8267, longitude: -71.4018, description: "Student center with dining and activities" },
    BuildingSeed { name: "Main Green", code: "MG", address: "College St", floors_count: 1, latitude: 41.8262, longitude: -71.4028, description: "Central campus green space" },
    BuildingSeed { name: "Wilson Hall", code: "WH", address: "69 Brown St", floors_count: 4, latitude: 41.8258, longitude: -71.4035, description: "Academic building" },
    BuildingSeed { name: "Sayles Hall", code: "SH", address: "79 Waterman St", floors_count: 3, latitude: 41.8265, longitude: -71.4022, description: "Historic assembly hall" },
    BuildingSeed { name: "MacMillan Hall", code: "MM", address: "167 Thayer St", floors_count: 4, latitude: 41.8275, longitude: -71.4008, description: "Engineering and physics building" },
    BuildingSeed { name: "Pembroke Hall", code: "PH", address: "172 Meeting St", floors_count: 3, latitude: 41.8280, longitude: -71.4015, description: "Historic academic building" },
    BuildingSeed { name: "John Hay Library", code: "JH", address: "20 Prospect St", floors_count: 5, latitude: 41.8260, longitude: -71.4040, description: "Special collections library" },
];

const KNOWN_FLOORPLANS: [(&str, &str); 10] = [
    ("BH-1", "/floorplans/barus-holley-1.png"),
    ("BH-2", "/floorplans/barus-holley-2.png"),
    ("SL-1", "/floorplans/sciences-library-1.png"),
    ("KQ-1", "/floorplans/keeney-quad-1.png"),
    ("FH-1", "/floorplans/faunce-house-1.png"),
    ("MG-1", "/floorplans/main-green-1.png"),
    ("WH-1", "/floorplans/wilson-hall-1.png"),
    ("SH-1", "/floorplans/sayles-hall-1.png"),
    ("MM-1", "/floorplans/macmillan-hall-1.png"),
    ("PH-1", "/floorplans/pembroke-hall-1.png"),
];

const FIRST_NAMES: [&str; 20] = [
    "James", "Emma", "Michael", "Sophia", "William", "Olivia", "Alexander", "Ava", "Daniel", "Isabella",
    "David", "Mia", "Joseph", "Charlotte", "Andrew", "Amelia", "Ryan", "Harper", "John", "Evelyn",
];

const LAST_NAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
    "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin",
];

const INCIDENT_TITLES: [&str; 8] = [
    "Security breach investigation",
    "Medical emergency response",
    "Fire alarm activation",
    "Suspicious package report",
    "Unauthorized access incident",
    "Vandalism report",
    "Theft investigation",
    "Disturbance report",
];

const SEEDED_EVENT_TYPES: [EventType; 8] = [
    EventType::CameraAlert,
    EventType::AccessEntry,
    EventType::AccessDenied,
    EventType::MotionDetect,
    EventType::WifiProbe,
    EventType::FacialMatch,
    EventType::Anomaly,
    EventType::System,
];

/// 告警状态按权重抽取：active 出现概率更高
const ALERT_STATUS_POOL: [AlertStatus; 7] = [
    AlertStatus::Active,
    AlertStatus::Active,
    AlertStatus::Active,
    AlertStatus::Acknowledged,
    AlertStatus::Investigating,
    AlertStatus::Resolved,
    AlertStatus::FalseAlarm,
];

const INCIDENT_STATUS_POOL: [IncidentStatus; 5] = [
    IncidentStatus::Open,
    IncidentStatus::Open,
    IncidentStatus::InProgress,
    IncidentStatus::Resolved,
    IncidentStatus::Closed,
];

const EVENT_SEVERITY_POOL: [Severity; 6] = [
    Severity::Info,
    Severity::Info,
    Severity::Info,
    Severity::Low,
    Severity::Medium,
    Severity::High,
];

/// 生成参数
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// 随机种子；None 时使用系统熵
    pub rng_seed: Option<u64>,
    pub entity_count: usize,
    pub alert_count: usize,
    pub incident_count: usize,
    pub event_count: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            rng_seed: None,
            entity_count: 500,
            alert_count: 50,
            incident_count: 15,
            event_count: 200,
        }
    }
}

/// 写入结果汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSummary {
    pub buildings: usize,
    pub floors: usize,
    pub cameras: usize,
    pub sensors: usize,
    pub access_readers: usize,
    pub wifi_access_points: usize,
    pub tracked_entities: usize,
    pub alerts: usize,
    pub incidents: usize,
    pub events: usize,
}

impl Display for SeedSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  - {} buildings", self.buildings)?;
        writeln!(f, "  - {} floors", self.floors)?;
        writeln!(f, "  - {} cameras", self.cameras)?;
        writeln!(f, "  - {} sensors", self.sensors)?;
        writeln!(f, "  - {} access readers", self.access_readers)?;
        writeln!(f, "  - {} WiFi access points", self.wifi_access_points)?;
        writeln!(f, "  - {} tracked entities", self.tracked_entities)?;
        writeln!(f, "  - {} alerts", self.alerts)?;
        writeln!(f, "  - {} incidents", self.incidents)?;
        write!(f, "  - {} events", self.events)
    }
}

// ==================== 生成辅助函数 ====================

/// 楼层平面图地址：已知平面图优先，否则按建筑简码与层号拼接
pub fn floorplan_url(code: &str, level: i32) -> String {
    let key = format!("{}-{}", code, level);
    KNOWN_FLOORPLANS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, url)| url.to_string())
        .unwrap_or_else(|| format!("/floorplans/{}-{}.png", code.to_lowercase(), level))
}

/// 每种告警类型对应的标题
pub fn alert_titles(alert_type: AlertType) -> [&'static str; 3] {
    match alert_type {
        AlertType::Weapon => ["Potential weapon detected", "Suspicious object identified", "Security threat detected"],
        AlertType::Intrusion => ["Unauthorized access attempt", "Perimeter breach detected", "After-hours entry"],
        AlertType::Anomaly => ["Unusual behavior detected", "Pattern anomaly identified", "Suspicious activity"],
        AlertType::Crowd => ["Large gathering detected", "Crowd density alert", "Unusual congregation"],
        AlertType::AccessViolation => ["Access denied - invalid credentials", "Tailgating detected", "Forced entry attempt"],
        AlertType::System => ["Camera offline", "Sensor malfunction", "Network connectivity issue"],
        AlertType::PersonDown => ["Person down detected", "Medical emergency possible", "Unresponsive individual"],
        AlertType::Fire => ["Smoke detected", "Fire alarm triggered", "Thermal anomaly"],
    }
}

/// 事件来源类型
pub fn event_source_type(event_type: EventType) -> &'static str {
    match event_type {
        EventType::CameraAlert => "camera",
        EventType::AccessEntry | EventType::AccessDenied => "access_reader",
        _ => "sensor",
    }
}

/// 事件标题：`access_denied` → `Access Denied Event`
pub fn event_title(event_type: EventType) -> String {
    let words: Vec<String> = event_type
        .as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("{} Event", words.join(" "))
}

/// `CAM-0001` 形式的设备编号
fn device_name(prefix: &str, index: usize) -> String {
    format!("{}-{:04}", prefix, index)
}

/// 保留 4 位小数的随机数，范围 [min, max)
fn random_decimal<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let value = rng.gen::<f64>() * (max - min) + min;
    (value * 10_000.0).round() / 10_000.0
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> AppResult<&'a T> {
    items
        .choose(rng)
        .ok_or_else(|| AppError::generic("演示数据生成失败: 候选列表为空"))
}

fn pick_enum<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> AppResult<T> {
    pick(rng, items).copied()
}

async fn insert_chunked<C, A>(db: &C, rows: Vec<A>, table: &'static str) -> AppResult<usize>
where
    C: ConnectionTrait,
    A: ActiveModelTrait,
{
    let total = rows.len();
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows.by_ref().take(INSERT_CHUNK_SIZE).collect();
        <A::Entity as EntityTrait>::insert_many(chunk)
            .exec(db)
            .await
            .map_err(|e| AppError::persistence_error(format!("写入 {} 失败: {}", table, e)))?;
    }
    log::info!("  ✓ 已写入 {} 条 {}", total, table);
    Ok(total)
}

// ==================== 主流程 ====================

/// 清空并重新生成演示数据
pub async fn seed_demo_data(conn: &DatabaseConnection, options: &SeedOptions) -> AppResult<SeedSummary> {
    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = Utc::now();

    log::info!("🌱 开始生成演示数据...");
    let txn = conn
        .begin()
        .await
        .map_err(|e| AppError::persistence_error(format!("开启事务失败: {}", e)))?;

    clear_demo_data(&txn).await?;

    let mut summary = SeedSummary::default();

    // 建筑
    let mut inserted_buildings: Vec<Building> = Vec::with_capacity(BUILDINGS.len());
    for seed in BUILDINGS.iter() {
        let building = buildings::ActiveModel {
            name: Set(seed.name.to_string()),
            code: Set(Some(seed.code.to_string())),
            address: Set(Some(seed.address.to_string())),
            floors_count: Set(seed.floors_count),
            latitude: Set(Some(seed.latitude)),
            longitude: Set(Some(seed.longitude)),
            description: Set(Some(seed.description.to_string())),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::persistence_error(format!("写入建筑失败: {}", e)))?;
        inserted_buildings.push(building);
    }
    summary.buildings = inserted_buildings.len();

    // 楼层
    let mut inserted_floors: Vec<Floor> = Vec::new();
    for building in &inserted_buildings {
        let code = building.code.clone().unwrap_or_default();
        for level in 1..=building.floors_count.clamp(1, MAX_SEEDED_FLOORS) {
            let floor = floors::ActiveModel {
                building_id: Set(building.id),
                level: Set(level),
                name: Set(format!("{} - Floor {}", building.name, level)),
                floorplan_url: Set(Some(floorplan_url(&code, level))),
                floorplan_width: Set(Some(FLOORPLAN_WIDTH)),
                floorplan_height: Set(Some(FLOORPLAN_HEIGHT)),
                scale_px_per_meter: Set(Some(FLOORPLAN_SCALE)),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::persistence_error(format!("写入楼层失败: {}", e)))?;
            inserted_floors.push(floor);
        }
    }
    summary.floors = inserted_floors.len();

    let building_names: HashMap<i32, String> =
        inserted_buildings.iter().map(|b| (b.id, b.name.clone())).collect();

    summary.cameras = insert_chunked(&txn, generate_cameras(&mut rng, &inserted_floors, now)?, "cameras").await?;
    summary.sensors = insert_chunked(&txn, generate_sensors(&mut rng, &inserted_floors, now)?, "sensors").await?;
    summary.access_readers =
        insert_chunked(&txn, generate_access_readers(&mut rng, &inserted_floors, now)?, "access_readers").await?;
    summary.wifi_access_points =
        insert_chunked(&txn, generate_wifi_access_points(&mut rng, &inserted_floors, now)?, "wifi_access_points").await?;
    summary.tracked_entities = insert_chunked(
        &txn,
        generate_entities(&mut rng, &inserted_floors, options.entity_count, now)?,
        "tracked_entities",
    )
    .await?;
    summary.alerts = insert_chunked(
        &txn,
        generate_alerts(&mut rng, &inserted_floors, &building_names, options.alert_count, now)?,
        "alerts",
    )
    .await?;
    summary.incidents = insert_chunked(
        &txn,
        generate_incidents(&mut rng, &inserted_floors, options.incident_count, now)?,
        "incidents",
    )
    .await?;
    summary.events = insert_chunked(
        &txn,
        generate_events(&mut rng, &inserted_floors, options.event_count, now)?,
        "events",
    )
    .await?;

    txn.commit()
        .await
        .map_err(|e| AppError::persistence_error(format!("提交演示数据失败: {}", e)))?;

    log::info!("✅ 演示数据生成完成");
    Ok(summary)
}

// ==================== 各表数据生成 ====================

fn generate_cameras<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    now: DateTime<Utc>,
) -> AppResult<Vec<cameras::ActiveModel>> {
    let mut rows = Vec::new();
    let mut index = 1;
    for floor in floors {
        for _ in 0..rng.gen_range(15..=25) {
            let status = if rng.gen::<f64>() > 0.05 {
                EquipmentStatus::Online
            } else {
                pick_enum(rng, &[EquipmentStatus::Offline, EquipmentStatus::Maintenance, EquipmentStatus::Error])?
            };
            rows.push(cameras::ActiveModel {
                building_id: Set(floor.building_id),
                floor_id: Set(Some(floor.id)),
                name: Set(device_name("CAM", index)),
                camera_type: Set(pick_enum(rng, &CameraType::all())?),
                rtsp_url: Set(Some(format!("rtsp://cameras.brown.edu/cam{}", index))),
                hls_url: Set(Some(format!("/api/cameras/{}/stream.m3u8", index))),
                snapshot_url: Set(None),
                x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
                y: Set(Some(random_decimal(rng, 50.0, 750.0))),
                fov_degrees: Set(rng.gen_range(60..=120)),
                rotation: Set(rng.gen_range(0..=359)),
                status: Set(status),
                has_ai: Set(rng.gen::<f64>() > 0.7),
                last_health_check: Set(None),
                metadata: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
            index += 1;
        }
    }
    Ok(rows)
}

fn generate_sensors<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    now: DateTime<Utc>,
) -> AppResult<Vec<sensors::ActiveModel>> {
    let mut rows = Vec::new();
    let mut index = 1;
    for floor in floors {
        for _ in 0..rng.gen_range(8..=15) {
            rows.push(sensors::ActiveModel {
                building_id: Set(floor.building_id),
                floor_id: Set(Some(floor.id)),
                name: Set(device_name("SENSOR", index)),
                sensor_type: Set(pick_enum(rng, &SensorType::all())?),
                x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
                y: Set(Some(random_decimal(rng, 50.0, 750.0))),
                external_id: Set(Some(format!("EXT-S-{}", index))),
                status: Set(if rng.gen::<f64>() > 0.1 { SensorStatus::Online } else { SensorStatus::Offline }),
                created_at: Set(now),
                ..Default::default()
            });
            index += 1;
        }
    }
    Ok(rows)
}

fn generate_access_readers<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    now: DateTime<Utc>,
) -> AppResult<Vec<access_readers::ActiveModel>> {
    let mut rows = Vec::new();
    let mut index = 1;
    for floor in floors {
        for _ in 0..rng.gen_range(2..=6) {
            rows.push(access_readers::ActiveModel {
                building_id: Set(floor.building_id),
                floor_id: Set(Some(floor.id)),
                name: Set(device_name("READER", index)),
                reader_type: Set(pick_enum(rng, &AccessReaderType::all())?),
                x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
                y: Set(Some(random_decimal(rng, 50.0, 750.0))),
                external_id: Set(Some(format!("EXT-R-{}", index))),
                status: Set(if rng.gen::<f64>() > 0.05 { EquipmentStatus::Online } else { EquipmentStatus::Offline }),
                created_at: Set(now),
                ..Default::default()
            });
            index += 1;
        }
    }
    Ok(rows)
}

fn generate_wifi_access_points<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    now: DateTime<Utc>,
) -> AppResult<Vec<wifi_access_points::ActiveModel>> {
    let mut rows = Vec::new();
    let mut index = 1;
    for floor in floors {
        for _ in 0..rng.gen_range(3..=8) {
            let bssid = format!(
                "00:1A:2B:{:02}:{:02}:{:02}",
                index % 100,
                rng.gen_range(10..=99),
                rng.gen_range(10..=99)
            );
            rows.push(wifi_access_points::ActiveModel {
                building_id: Set(floor.building_id),
                floor_id: Set(Some(floor.id)),
                name: Set(device_name("AP", index)),
                bssid: Set(Some(bssid)),
                x: Set(Some(random_decimal(rng, 100.0, 1100.0))),
                y: Set(Some(random_decimal(rng, 100.0, 700.0))),
                coverage_radius: Set(rng.gen_range(20..=50)),
                status: Set(if rng.gen::<f64>() > 0.05 { EquipmentStatus::Online } else { EquipmentStatus::Offline }),
                created_at: Set(now),
                ..Default::default()
            });
            index += 1;
        }
    }
    Ok(rows)
}

fn generate_entities<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    count: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<tracked_entities::ActiveModel>> {
    let mut rows = Vec::with_capacity(count);
    for i in 1..=count {
        let first = pick(rng, &FIRST_NAMES)?;
        let last = pick(rng, &LAST_NAMES)?;
        let role = pick_enum(rng, &EntityRole::all())?;
        let floor = pick(rng, floors)?;
        let is_watchlist = rng.gen::<f64>() > 0.98;
        let risk_score = if rng.gen::<f64>() > 0.95 { rng.gen_range(50..=100) } else { rng.gen_range(0..=30) };
        let last_seen_at = now - Duration::milliseconds(rng.gen_range(0..=300_000));

        rows.push(tracked_entities::ActiveModel {
            entity_type: Set(EntityType::Person),
            identifier_hash: Set(Some(format!("HASH-{:06}", i))),
            display_name: Set(Some(format!("{} {}", first, last))),
            role: Set(role),
            is_watchlist: Set(is_watchlist),
            risk_score: Set(risk_score),
            last_seen_at: Set(Some(last_seen_at)),
            last_floor_id: Set(Some(floor.id)),
            last_x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
            last_y: Set(Some(random_decimal(rng, 50.0, 750.0))),
            metadata: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
    }
    Ok(rows)
}

fn generate_alerts<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    building_names: &HashMap<i32, String>,
    count: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<alerts::ActiveModel>> {
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let alert_type = pick_enum(rng, &AlertType::all())?;
        let floor = pick(rng, floors)?;
        let building_name = building_names.get(&floor.building_id).map(String::as_str).unwrap_or("Unknown");
        let title = pick(rng, &alert_titles(alert_type))?.to_string();

        rows.push(alerts::ActiveModel {
            alert_type: Set(alert_type),
            severity: Set(pick_enum(rng, &AlertSeverity::all())?),
            status: Set(pick_enum(rng, &ALERT_STATUS_POOL)?),
            title: Set(title),
            description: Set(Some(format!("Alert detected at {}, Floor {}", building_name, floor.level))),
            building_id: Set(Some(floor.building_id)),
            floor_id: Set(Some(floor.id)),
            x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
            y: Set(Some(random_decimal(rng, 50.0, 750.0))),
            ai_confidence: Set(Some(random_decimal(rng, 0.7, 0.99))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
    }
    Ok(rows)
}

fn generate_incidents<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    count: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<incidents::ActiveModel>> {
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let floor = pick(rng, floors)?;
        rows.push(incidents::ActiveModel {
            status: Set(pick_enum(rng, &INCIDENT_STATUS_POOL)?),
            priority: Set(pick_enum(rng, &IncidentPriority::all())?),
            title: Set(pick(rng, &INCIDENT_TITLES)?.to_string()),
            description: Set(Some("Incident requiring investigation and response".to_string())),
            building_id: Set(Some(floor.building_id)),
            floor_id: Set(Some(floor.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
    }
    Ok(rows)
}

fn generate_events<R: Rng + ?Sized>(
    rng: &mut R,
    floors: &[Floor],
    count: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<events::ActiveModel>> {
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let event_type = pick_enum(rng, &SEEDED_EVENT_TYPES)?;
        let floor = pick(rng, floors)?;
        let timestamp = now - Duration::milliseconds(rng.gen_range(0..=3_600_000));

        rows.push(events::ActiveModel {
            event_type: Set(event_type),
            severity: Set(pick_enum(rng, &EVENT_SEVERITY_POOL)?),
            source_type: Set(Some(event_source_type(event_type).to_string())),
            building_id: Set(Some(floor.building_id)),
            floor_id: Set(Some(floor.id)),
            x: Set(Some(random_decimal(rng, 50.0, 1150.0))),
            y: Set(Some(random_decimal(rng, 50.0, 750.0))),
            title: Set(Some(event_title(event_type))),
            description: Set(Some("Automated event detection".to_string())),
            timestamp: Set(timestamp),
            created_at: Set(now),
            ..Default::default()
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};
    use crate::services::infrastructure::database::{setup_schema, DatabaseHandle};
    use crate::utils::config::DatabaseConfig;

    async fn create_test_db() -> DatabaseHandle {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let handle = DatabaseHandle::from_config(&config).await.unwrap();
        setup_schema(handle.require().unwrap()).await.unwrap();
        handle
    }

    fn small_options(seed: u64) -> SeedOptions {
        SeedOptions {
            rng_seed: Some(seed),
            entity_count: 40,
            alert_count: 10,
            incident_count: 5,
            event_count: 30,
        }
    }

    #[test]
    fn test_floorplan_url() {
        assert_eq!(floorplan_url("BH", 2), "/floorplans/barus-holley-2.png");
        assert_eq!(floorplan_url("BH", 3), "/floorplans/bh-3.png");
        assert_eq!(floorplan_url("JH", 1), "/floorplans/jh-1.png");
    }

    #[test]
    fn test_event_helpers() {
        assert_eq!(event_title(EventType::AccessDenied), "Access Denied Event");
        assert_eq!(event_title(EventType::System), "System Event");
        assert_eq!(event_source_type(EventType::CameraAlert), "camera");
        assert_eq!(event_source_type(EventType::AccessEntry), "access_reader");
        assert_eq!(event_source_type(EventType::WifiProbe), "sensor");
    }

    #[test]
    fn test_alert_titles_cover_every_type() {
        for alert_type in AlertType::all() {
            assert!(alert_titles(alert_type).iter().all(|t| !t.is_empty()));
        }
    }

    #[test]
    fn test_random_decimal_precision() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let v = random_decimal(&mut rng, 0.7, 0.99);
            assert!((0.7..=0.99).contains(&v));
            assert_eq!((v * 10_000.0).round() / 10_000.0, v);
        }
    }

    #[tokio::test]
    async fn test_seed_counts_and_shape() {
        let db = create_test_db().await;
        let conn = db.require().unwrap();

        let summary = seed_demo_data(conn, &small_options(2024)).await.unwrap();
        assert_eq!(summary.buildings, 10);
        // 4+4+4+3+1+4+3+4+3+4
        assert_eq!(summary.floors, 34);
        assert!(summary.cameras >= 15 * 34 && summary.cameras <= 25 * 34);
        assert!(summary.sensors >= 8 * 34 && summary.sensors <= 15 * 34);
        assert!(summary.access_readers >= 2 * 34 && summary.access_readers <= 6 * 34);
        assert!(summary.wifi_access_points >= 3 * 34 && summary.wifi_access_points <= 8 * 34);
        assert_eq!(summary.tracked_entities, 40);
        assert_eq!(summary.alerts, 10);
        assert_eq!(summary.incidents, 5);
        assert_eq!(summary.events, 30);

        assert_eq!(cameras::Entity::find().count(conn).await.unwrap() as usize, summary.cameras);
        let first_camera = cameras::Entity::find()
            .filter(cameras::Column::Name.eq("CAM-0001"))
            .one(conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first_camera.rtsp_url.as_deref(), Some("rtsp://cameras.brown.edu/cam1"));
        assert_eq!(first_camera.hls_url.as_deref(), Some("/api/cameras/1/stream.m3u8"));

        let sl_floors = floors::Entity::find()
            .filter(floors::Column::Name.starts_with("Sciences Library"))
            .count(conn)
            .await
            .unwrap();
        assert_eq!(sl_floors, 4);

        let recent = events::Entity::find()
            .filter(events::Column::Timestamp.gte(Utc::now() - Duration::minutes(61)))
            .count(conn)
            .await
            .unwrap();
        assert_eq!(recent, 30);

        println!("{}", summary);
    }

    #[tokio::test]
    async fn test_seed_is_repeatable_and_deterministic() {
        let db = create_test_db().await;
        let conn = db.require().unwrap();

        let first = seed_demo_data(conn, &small_options(7)).await.unwrap();
        let second = seed_demo_data(conn, &small_options(7)).await.unwrap();
        assert_eq!(first, second);

        // 重复执行会先清空旧数据
        assert_eq!(buildings::Entity::find().count(conn).await.unwrap(), 10);
        assert_eq!(tracked_entities::Entity::find().count(conn).await.unwrap(), 40);
    }
}
