//! # 核心结构体定义
//!
//! 本模块定义 RPC 过程的输入/输出结构（DTO），表结构本身见 `entities`
//!
//! - 所有结构按 camelCase 进行 JSON 序列化
//! - 坐标、置信度、经纬度既接受 JSON 数字也接受数字字符串
//! - 过滤条件结构均实现 `Default`，RPC 输入为空时按默认值处理

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use crate::models::enums::*;
use crate::models::entities::Camera;

/// 列表默认条数上限
pub const DEFAULT_ALERT_LIMIT: u64 = 50;
pub const DEFAULT_INCIDENT_LIMIT: u64 = 50;
pub const DEFAULT_EVENT_LIMIT: u64 = 100;
pub const DEFAULT_AUDIT_LIMIT: u64 = 100;
/// 任意列表查询允许的最大条数
pub const MAX_LIST_LIMIT: u64 = 1000;

/// 摄像头网格默认每页数量（3×3）
pub const DEFAULT_GRID_PAGE_SIZE: u64 = 9;
pub const MAX_GRID_PAGE_SIZE: u64 = 100;

/// 计算实际使用的 limit：未提供或为 0 时取默认值，且不超过 [`MAX_LIST_LIMIT`]
pub fn effective_limit(limit: Option<u64>, default: u64) -> u64 {
    match limit {
        None | Some(0) => default,
        Some(n) => n.min(MAX_LIST_LIMIT),
    }
}

// ==================== 数值兼容反序列化 ====================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_from<E: DeError>(value: NumberOrString) -> Result<f64, E> {
    let n = match value {
        NumberOrString::Number(n) => n,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid number: \"{}\"", s)))?,
    };
    if n.is_finite() {
        Ok(n)
    } else {
        Err(E::custom("number must be finite"))
    }
}

/// 接受 `12.5` 或 `"12.5"`
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    number_from(NumberOrString::deserialize(deserializer)?)
}

/// 可选版本，`null` 或缺省时为 `None`
pub fn flexible_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => number_from(value).map(Some),
        None => Ok(None),
    }
}

// ==================== 通用 ====================

/// 按主键查询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInput {
    pub id: i32,
}

/// 仅表示成功与否的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ==================== system ====================

/// system.health 输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInput {
    pub timestamp: f64,
}

/// 所有者通知内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub content: String,
}

// ==================== auth ====================

/// 演示登录输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoLoginInput {
    pub username: String,
    pub password: String,
}

/// 登录响应中的用户概要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub role: String,
    pub name: String,
}

/// 演示登录响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoLoginResponse {
    pub success: bool,
    pub user: LoginUser,
    pub token: String,
}

// ==================== buildings / floors / zones ====================

/// 新建建筑
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildingInput {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub floors_count: Option<i32>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// floors.list 过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorFilter {
    #[serde(default)]
    pub building_id: Option<i32>,
}

/// zones.list / locations.current 输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorIdInput {
    pub floor_id: i32,
}

// ==================== 设备 ====================

/// 摄像头过滤条件（各条件之间为 AND）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraFilter {
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default)]
    pub status: Option<EquipmentStatus>,
}

/// 更新摄像头状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCameraStatusInput {
    pub id: i32,
    pub status: EquipmentStatus,
}

/// 摄像头状态统计，四个状态之和等于 total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraStats {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    pub maintenance: u64,
    pub error: u64,
}

/// 摄像头网格分页请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraGridInput {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(flatten)]
    pub filter: CameraFilter,
}

impl CameraGridInput {
    /// 规范化后的 (page, page_size)：page 至少为 1，page_size 默认 9、最大 100
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = match self.page_size {
            None | Some(0) => DEFAULT_GRID_PAGE_SIZE,
            Some(n) => n.min(MAX_GRID_PAGE_SIZE),
        };
        (page, page_size)
    }
}

/// 摄像头网格分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraGridPage {
    pub cameras: Vec<Camera>,
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total: u64,
}

impl CameraGridPage {
    /// 空页（无数据库或无数据）
    pub fn empty(page: u64, page_size: u64) -> Self {
        Self {
            cameras: Vec::new(),
            page,
            page_size,
            page_count: 0,
            total: 0,
        }
    }
}

/// 页数 = ceil(total / page_size)
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// 传感器过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorFilter {
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default, rename = "type")]
    pub sensor_type: Option<SensorType>,
}

/// 门禁 / 无线AP 过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFilter {
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
}

// ==================== 追踪 ====================

/// 实体过滤条件；floor_id 匹配实体最后所在楼层
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default)]
    pub role: Option<EntityRole>,
    #[serde(default)]
    pub is_watchlist: Option<bool>,
}

/// 位置历史查询
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationHistoryInput {
    pub entity_id: i32,
    #[serde(default)]
    pub minutes: Option<i64>,
}

/// 实体统计；contractor 计入 unknown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub total: u64,
    pub staff: u64,
    pub students: u64,
    pub visitors: u64,
    pub unknown: u64,
    pub watchlist: u64,
}

/// 楼层上的实体当前位置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocation {
    pub entity_id: i32,
    pub display_name: Option<String>,
    pub role: EntityRole,
    pub is_watchlist: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// 记录一次定位
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocationInput {
    pub entity_id: i32,
    pub floor_id: i32,
    pub source_type: LocationSource,
    #[serde(deserialize_with = "flexible_f64")]
    pub x: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub y: f64,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub confidence: Option<f64>,
}

// ==================== 告警 ====================

/// 告警列表过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    #[serde(default)]
    pub status: Option<AlertStatus>,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    #[serde(default, rename = "type")]
    pub alert_type: Option<AlertType>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// 更新告警状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlertStatusInput {
    pub id: i32,
    pub status: AlertStatus,
    #[serde(default)]
    pub resolution_notes: Option<String>,
}

/// 新建告警
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertInput {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub ai_confidence: Option<f64>,
}

/// 告警统计；按严重程度的计数只统计 active 告警
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: u64,
    pub active: u64,
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

// ==================== 事件单 ====================

/// 事件单列表过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilter {
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub priority: Option<IncidentPriority>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// 新建事件单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentInput {
    pub title: String,
    pub priority: IncidentPriority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default)]
    pub linked_alert_ids: Option<Vec<i32>>,
}

/// 更新事件单状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIncidentStatusInput {
    pub id: i32,
    pub status: IncidentStatus,
}

/// 事件单统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

// ==================== 事件 ====================

/// 事件列表过滤条件
///
/// `type` 以字符串接收：能解析为 [`EventType`] 时才参与过滤
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub building_id: Option<i32>,
    #[serde(default)]
    pub floor_id: Option<i32>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl EventFilter {
    /// 解析后的事件类型，无法识别时返回 None
    pub fn parsed_type(&self) -> Option<EventType> {
        self.event_type.as_deref().and_then(|t| t.parse().ok())
    }
}

// ==================== 仪表盘 ====================

/// 仪表盘总览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_cameras: u64,
    pub cameras_online: u64,
    pub cameras_online_percent: f64,
    pub active_alerts: u64,
    pub critical_alerts: u64,
    pub open_incidents: u64,
    pub tracked_entities: u64,
    pub recent_events: u64,
}

/// 在线率百分比，保留两位小数；没有摄像头时为 0
pub fn online_percent(online: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = online as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

// ==================== 设置 / 审计 / 场景 ====================

/// settings.get 输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingKeyInput {
    pub key: String,
}

/// settings.set 输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSettingInput {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
}

/// audit.list 过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub entity_type: Option<String>,
}

/// 写入审计日志所需的信息
#[derive(Debug, Clone, Default)]
pub struct AuditRecord {
    pub user_id: Option<i32>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None, 50), 50);
        assert_eq!(effective_limit(Some(0), 50), 50);
        assert_eq!(effective_limit(Some(10), 50), 10);
        assert_eq!(effective_limit(Some(5000), 50), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_flexible_numbers() {
        let input: RecordLocationInput = serde_json::from_value(json!({
            "entityId": 1, "floorId": 2, "sourceType": "wifi", "x": "12.5", "y": 40
        }))
        .unwrap();
        assert_eq!(input.x, 12.5);
        assert_eq!(input.y, 40.0);
        assert_eq!(input.confidence, None);

        let input: CreateAlertInput = serde_json::from_value(json!({
            "type": "weapon", "severity": "critical", "title": "Gun", "aiConfidence": "0.93"
        }))
        .unwrap();
        assert_eq!(input.ai_confidence, Some(0.93));
        assert_eq!(input.x, None);

        let bad = serde_json::from_value::<RecordLocationInput>(json!({
            "entityId": 1, "floorId": 2, "sourceType": "wifi", "x": "abc", "y": 1
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_enum_membership_is_enforced() {
        let bad = serde_json::from_value::<UpdateCameraStatusInput>(json!({"id": 1, "status": "broken"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_grid_normalization() {
        let input = CameraGridInput::default();
        assert_eq!(input.normalized(), (1, 9));

        let input: CameraGridInput = serde_json::from_value(json!({
            "page": 0, "pageSize": 500, "status": "online", "buildingId": 3
        }))
        .unwrap();
        assert_eq!(input.normalized(), (1, 100));
        assert_eq!(input.filter.status, Some(EquipmentStatus::Online));
        assert_eq!(input.filter.building_id, Some(3));

        assert_eq!(page_count(0, 9), 0);
        assert_eq!(page_count(9, 9), 1);
        assert_eq!(page_count(10, 9), 2);
        assert_eq!(page_count(u64::MAX, 100), u64::MAX / 100 + 1);
        assert_eq!(page_count(u64::MAX, 1), u64::MAX);
        assert_eq!(page_count(5, 0), 0);

        let input: CameraGridInput = serde_json::from_value(json!({ "page": u64::MAX })).unwrap();
        assert_eq!(input.normalized(), (u64::MAX, 9));
    }

    #[test]
    fn test_online_percent() {
        assert_eq!(online_percent(0, 0), 0.0);
        assert_eq!(online_percent(2, 3), 66.67);
        assert_eq!(online_percent(5, 5), 100.0);
    }

    #[test]
    fn test_event_filter_type_parsing() {
        let filter: EventFilter = serde_json::from_value(json!({"type": "intrusion"})).unwrap();
        assert_eq!(filter.parsed_type(), Some(EventType::Intrusion));

        let filter: EventFilter = serde_json::from_value(json!({"type": "nonsense"})).unwrap();
        assert_eq!(filter.parsed_type(), None);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = IncidentStats { total: 3, open: 1, in_progress: 1, resolved: 1, closed: 0 };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["inProgress"], 1);
    }
}
