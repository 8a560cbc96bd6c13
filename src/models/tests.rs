//! 枚举与实体序列化测试

use super::enums::*;
use super::entities::{cameras, tracked_entities};
use chrono::Utc;
use serde_json::json;
use std::str::FromStr;

#[test]
fn test_enum_string_round_trip() {
    assert_eq!(SensorType::GlassBreak.as_str(), "glass_break");
    assert_eq!(AlertStatus::FalseAlarm.to_string(), "false_alarm");
    assert_eq!(IncidentStatus::from_str("in_progress"), Ok(IncidentStatus::InProgress));
    assert!(EventType::from_str("earthquake").is_err());

    assert_eq!(serde_json::to_value(AlertType::AccessViolation).unwrap(), json!("access_violation"));
    let parsed: EventType = serde_json::from_value(json!("person_down")).unwrap();
    assert_eq!(parsed, EventType::PersonDown);
}

#[test]
fn test_enum_value_sets() {
    assert_eq!(UserRole::all().len(), 4);
    assert_eq!(ZoneType::all().len(), 9);
    assert_eq!(EventType::all().len(), 12);
    assert_eq!(Severity::all().len(), 5);
    assert_eq!(AlertType::all().len(), 8);
    assert_eq!(EntityRole::all(), vec![
        EntityRole::Staff,
        EntityRole::Student,
        EntityRole::Visitor,
        EntityRole::Contractor,
        EntityRole::Unknown,
    ]);
}

#[test]
fn test_alert_severity_priority() {
    assert_eq!(AlertSeverity::Critical.priority(), 4);
    assert_eq!(AlertSeverity::High.priority(), 3);
    assert_eq!(AlertSeverity::Medium.priority(), 2);
    assert_eq!(AlertSeverity::Low.priority(), 1);

    let mut items = vec![AlertSeverity::Low, AlertSeverity::Critical, AlertSeverity::Medium, AlertSeverity::High];
    AlertSeverity::sort_by_priority_desc(&mut items, |s| *s);
    assert_eq!(items, vec![AlertSeverity::Critical, AlertSeverity::High, AlertSeverity::Medium, AlertSeverity::Low]);
}

#[test]
fn test_risk_level() {
    assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(80), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(79), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(50), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(49), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
}

#[test]
fn test_alert_status_terminal() {
    assert!(AlertStatus::Resolved.is_terminal());
    assert!(AlertStatus::FalseAlarm.is_terminal());
    assert!(!AlertStatus::Acknowledged.is_terminal());
}

#[test]
fn test_camera_serializes_has_ai_and_type() {
    let now = Utc::now();
    let camera = cameras::Model {
        id: 7,
        building_id: 1,
        floor_id: Some(2),
        name: "CAM-0007".to_string(),
        camera_type: CameraType::Ptz,
        rtsp_url: None,
        hls_url: None,
        snapshot_url: None,
        x: Some(10.5),
        y: Some(20.0),
        fov_degrees: 90,
        rotation: 0,
        status: EquipmentStatus::Online,
        has_ai: true,
        last_health_check: None,
        metadata: None,
        created_at: now,
        updated_at: now,
    };

    let value = serde_json::to_value(&camera).unwrap();
    assert_eq!(value["hasAI"], json!(true));
    assert_eq!(value["type"], json!("ptz"));
    assert_eq!(value["buildingId"], json!(1));
    assert_eq!(value["fovDegrees"], json!(90));
    assert!(value.get("has_ai").is_none());
}

#[test]
fn test_tracked_entity_risk_level() {
    let now = Utc::now();
    let entity = tracked_entities::Model {
        id: 1,
        entity_type: EntityType::Person,
        identifier_hash: None,
        display_name: Some("Visitor 1".to_string()),
        role: EntityRole::Visitor,
        is_watchlist: true,
        risk_score: 85,
        last_seen_at: Some(now),
        last_floor_id: Some(1),
        last_x: Some(1.0),
        last_y: Some(2.0),
        metadata: None,
        created_at: now,
        updated_at: now,
    };
    assert_eq!(entity.risk_level(), RiskLevel::High);
    assert_eq!(serde_json::to_value(&entity).unwrap()["isWatchlist"], json!(true));
}
