//! HTTP/RPC 接口集成测试
//!
//! 使用 axum-test 直接驱动路由，数据库为内存 SQLite

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use std::sync::Arc;
use eli_lib::models::NotificationPayload;
use eli_lib::services::auth::SessionService;
use eli_lib::services::domain::{seed_demo_data, SeedOptions};
use eli_lib::services::{BaseService, DatabaseHandle, NotificationService};
use eli_lib::utils::config::{AppConfig, AuthConfig, DatabaseConfig};
use eli_lib::{create_router, AppResult, AppState};

/// 固定返回结果的通知服务
struct StubNotifier {
    delivered: bool,
}

#[async_trait]
impl NotificationService for StubNotifier {
    async fn notify_owner(&self, payload: NotificationPayload) -> AppResult<bool> {
        eli_lib::services::infrastructure::notification_service::validate_payload(&payload)?;
        Ok(self.delivered)
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

async fn sqlite_db() -> DatabaseHandle {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    let mut db = DatabaseHandle::from_config(&config).await.unwrap();
    db.initialize().await.unwrap();
    db
}

fn server_with(db: DatabaseHandle) -> TestServer {
    let state = AppState::with_notifier(test_config(), db, Arc::new(StubNotifier { delivered: true })).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

async fn create_test_server() -> TestServer {
    server_with(sqlite_db().await)
}

async fn create_seeded_server() -> TestServer {
    let db = sqlite_db().await;
    let options = SeedOptions {
        rng_seed: Some(2024),
        entity_count: 60,
        ..SeedOptions::default()
    };
    seed_demo_data(db.require().unwrap(), &options).await.unwrap();
    server_with(db)
}

fn rows(response: &TestResponse) -> Vec<Value> {
    response.assert_status_ok();
    data(response).as_array().cloned().unwrap_or_default()
}

fn create_offline_server() -> TestServer {
    server_with(DatabaseHandle::unavailable())
}

fn session_cookie(username: &str, role: &str) -> HeaderValue {
    let session = SessionService::new(test_config().auth).unwrap();
    let token = session.create_session_token(username, role, "Test User").unwrap();
    HeaderValue::from_str(&format!("app_session_id={}", token)).unwrap()
}

fn admin_cookie() -> HeaderValue {
    session_cookie("admin", "admin")
}

async fn query(server: &TestServer, path: &str, input: Option<Value>) -> TestResponse {
    let mut request = server.get(&format!("/api/trpc/{}", path));
    if let Some(input) = input {
        request = request.add_query_param("input", input.to_string());
    }
    request.await
}

async fn admin_query(server: &TestServer, path: &str, input: Option<Value>) -> TestResponse {
    let mut request = server
        .get(&format!("/api/trpc/{}", path))
        .add_header(HeaderName::from_static("cookie"), admin_cookie());
    if let Some(input) = input {
        request = request.add_query_param("input", input.to_string());
    }
    request.await
}

async fn mutate(server: &TestServer, path: &str, input: Value) -> TestResponse {
    server.post(&format!("/api/trpc/{}", path)).json(&input).await
}

async fn admin_mutate(server: &TestServer, path: &str, input: Value) -> TestResponse {
    server
        .post(&format!("/api/trpc/{}", path))
        .add_header(HeaderName::from_static("cookie"), admin_cookie())
        .json(&input)
        .await
}

fn data(response: &TestResponse) -> Value {
    let body: Value = response.json();
    body["result"]["data"].clone()
}

fn set_cookies(response: &TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

// ============ REST ============

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_offline_server();

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

// ============ 协议 ============

#[tokio::test]
async fn test_system_health_procedure() {
    let server = create_offline_server();

    let response = query(&server, "system.health", Some(json!({ "timestamp": 1700000000000u64 }))).await;
    response.assert_status_ok();
    assert_eq!(data(&response), json!({ "ok": true }));

    let response = query(&server, "system.health", Some(json!({ "timestamp": -1 }))).await;
    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "timestamp cannot be negative");
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["data"]["path"], "system.health");
}

#[tokio::test]
async fn test_unknown_procedure_and_wrong_method() {
    let server = create_offline_server();

    let response = query(&server, "buildings.destroy", None).await;
    assert_eq!(response.status_code().as_u16(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let response = mutate(&server, "buildings.list", json!(null)).await;
    assert_eq!(response.status_code().as_u16(), 405);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "METHOD_NOT_SUPPORTED");
    assert_eq!(body["error"]["data"]["httpStatus"], 405);

    let response = query(&server, "buildings.create", None).await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_malformed_input() {
    let server = create_offline_server();

    let response = server
        .get("/api/trpc/buildings.getById")
        .add_query_param("input", "{not json")
        .await;
    assert_eq!(response.status_code().as_u16(), 400);

    let response = query(&server, "buildings.getById", Some(json!({ "id": "seven" }))).await;
    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============ 认证 ============

#[tokio::test]
async fn test_demo_login_sets_cookie() {
    let server = create_offline_server();

    let response = mutate(&server, "auth.demoLogin", json!({ "username": "admin", "password": "admin" })).await;
    response.assert_status_ok();

    let result = data(&response);
    assert_eq!(result["success"], true);
    assert_eq!(result["user"]["role"], "admin");
    let token = result["token"].as_str().unwrap().to_string();

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with(&format!("app_session_id={}", token)));
    assert!(cookies[0].contains("Max-Age=86400"));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(!cookies[0].contains("Secure"));

    let response = server
        .get("/api/trpc/auth.me")
        .add_header(
            HeaderName::from_static("cookie"),
            HeaderValue::from_str(&format!("app_session_id={}", token)).unwrap(),
        )
        .await;
    let me = data(&response);
    assert_eq!(me["id"], 1);
    assert_eq!(me["openId"], "admin");
    assert_eq!(me["role"], "admin");
    assert_eq!(me["loginMethod"], "password");
}

#[tokio::test]
async fn test_demo_login_over_https_is_secure() {
    let server = create_offline_server();

    let response = server
        .post("/api/trpc/auth.demoLogin")
        .add_header(HeaderName::from_static("x-forwarded-proto"), HeaderValue::from_static("https"))
        .json(&json!({ "username": "admin", "password": "admin" }))
        .await;
    response.assert_status_ok();
    assert!(set_cookies(&response)[0].ends_with("; Secure"));
}

#[tokio::test]
async fn test_demo_login_rejects_bad_credentials() {
    let server = create_offline_server();

    let response = mutate(&server, "auth.demoLogin", json!({ "username": "admin", "password": "wrong" })).await;
    assert_eq!(response.status_code().as_u16(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid credentials");
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_me_and_logout() {
    let server = create_offline_server();

    let response = query(&server, "auth.me", None).await;
    assert_eq!(data(&response), Value::Null);

    let response = server
        .get("/api/trpc/auth.me")
        .add_header(HeaderName::from_static("cookie"), HeaderValue::from_static("app_session_id=garbage"))
        .await;
    assert_eq!(data(&response), Value::Null);

    let response = mutate(&server, "auth.logout", json!(null)).await;
    assert_eq!(data(&response), json!({ "success": true }));
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("app_session_id=;") && c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("demo_token=;") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_admin_procedures_are_gated() {
    let server = create_offline_server();

    let response = query(&server, "settings.list", None).await;
    assert_eq!(response.status_code().as_u16(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Please login (10001)");

    let response = server
        .get("/api/trpc/settings.list")
        .add_header(HeaderName::from_static("cookie"), session_cookie("guard", "user"))
        .await;
    assert_eq!(response.status_code().as_u16(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "You do not have required permission (10002)");

    let response = admin_query(&server, "settings.list", None).await;
    response.assert_status_ok();
    assert_eq!(data(&response), json!([]));
}

#[tokio::test]
async fn test_notify_owner() {
    let server = create_offline_server();

    let payload = json!({ "title": "Door forced", "content": "Sciences Library east door" });
    let response = mutate(&server, "system.notifyOwner", payload.clone()).await;
    assert_eq!(response.status_code().as_u16(), 401);

    let response = admin_mutate(&server, "system.notifyOwner", payload).await;
    assert_eq!(data(&response), json!({ "success": true }));

    let response = admin_mutate(&server, "system.notifyOwner", json!({ "title": " ", "content": "x" })).await;
    assert_eq!(response.status_code().as_u16(), 400);
}

// ============ 数据库不可用 ============

#[tokio::test]
async fn test_offline_queries_degrade() {
    let server = create_offline_server();

    assert_eq!(data(&query(&server, "buildings.list", None).await), json!([]));
    assert_eq!(data(&query(&server, "alerts.getById", Some(json!({ "id": 1 }))).await), Value::Null);

    let stats = data(&query(&server, "cameras.stats", None).await);
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["online"], 0);

    let grid = data(&query(&server, "cameras.grid", None).await);
    assert_eq!(grid["cameras"], json!([]));
    assert_eq!(grid["page"], 1);
    assert_eq!(grid["pageSize"], 9);
    assert_eq!(grid["pageCount"], 0);

    let overview = data(&query(&server, "dashboard.overview", None).await);
    assert_eq!(overview["totalCameras"], 0);
    assert_eq!(overview["openIncidents"], 0);
}

#[tokio::test]
async fn test_offline_mutations_fail() {
    let server = create_offline_server();

    let response = mutate(&server, "buildings.create", json!({ "name": "Watson Center" })).await;
    assert_eq!(response.status_code().as_u16(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Database not available");
    assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");

    let response = mutate(&server, "alerts.updateStatus", json!({ "id": 1, "status": "resolved" })).await;
    assert_eq!(response.status_code().as_u16(), 500);
}

// ============ 数据库读写 ============

#[tokio::test]
async fn test_building_create_is_audited() {
    let server = create_test_server().await;

    let response = server
        .post("/api/trpc/buildings.create")
        .add_header(HeaderName::from_static("cookie"), admin_cookie())
        .add_header(HeaderName::from_static("x-forwarded-for"), HeaderValue::from_static("10.1.2.3"))
        .json(&json!({ "name": "Sciences Library", "code": "SCILI", "floorsCount": 14 }))
        .await;
    response.assert_status_ok();
    let building = data(&response);
    assert_eq!(building["floorsCount"], 14);
    let id = building["id"].as_i64().unwrap();

    let list = data(&query(&server, "buildings.list", None).await);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let fetched = data(&query(&server, "buildings.getById", Some(json!({ "id": id }))).await);
    assert_eq!(fetched["name"], "Sciences Library");

    let audit = data(&admin_query(&server, "audit.list", Some(json!({ "entityType": "building" }))).await);
    let entries = audit.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "buildings.create");
    assert_eq!(entries[0]["userId"], 1);
    assert_eq!(entries[0]["entityId"], id);
    assert_eq!(entries[0]["ipAddress"], "10.1.2.3");
}

#[tokio::test]
async fn test_building_create_requires_name() {
    let server = create_test_server().await;

    let response = mutate(&server, "buildings.create", json!({ "code": "X" })).await;
    assert_eq!(response.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_alert_lifecycle() {
    let server = create_test_server().await;

    let response = mutate(
        &server,
        "alerts.create",
        json!({ "type": "intrusion", "severity": "critical", "title": "Forced entry", "aiConfidence": 0.91 }),
    )
    .await;
    response.assert_status_ok();
    let alert = data(&response);
    assert_eq!(alert["status"], "active");
    let id = alert["id"].as_i64().unwrap();

    let stats = data(&query(&server, "alerts.stats", None).await);
    assert_eq!(stats["active"], 1);
    assert_eq!(stats["critical"], 1);

    let overview = data(&query(&server, "dashboard.overview", None).await);
    assert_eq!(overview["criticalAlerts"], 1);

    let response = admin_mutate(&server, "alerts.updateStatus", json!({ "id": id, "status": "acknowledged" })).await;
    assert_eq!(data(&response), json!({ "success": true }));

    let fetched = data(&query(&server, "alerts.getById", Some(json!({ "id": id }))).await);
    assert_eq!(fetched["status"], "acknowledged");
    assert_eq!(fetched["acknowledgedBy"], 1);
    assert!(fetched["acknowledgedAt"].is_string());

    let response = admin_mutate(
        &server,
        "alerts.updateStatus",
        json!({ "id": id, "status": "resolved", "resolutionNotes": "Door secured" }),
    )
    .await;
    response.assert_status_ok();
    let fetched = data(&query(&server, "alerts.getById", Some(json!({ "id": id }))).await);
    assert_eq!(fetched["resolutionNotes"], "Door secured");
    assert!(fetched["resolvedAt"].is_string());

    let stats = data(&query(&server, "alerts.stats", None).await);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["active"], 0);
    assert_eq!(stats["critical"], 0);

    let response = mutate(&server, "alerts.updateStatus", json!({ "id": 999, "status": "resolved" })).await;
    assert_eq!(response.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_incident_lifecycle() {
    let server = create_test_server().await;

    let response = mutate(&server, "incidents.create", json!({ "title": "Suspicious package", "priority": "high" })).await;
    response.assert_status_ok();
    let incident = data(&response);
    assert_eq!(incident["status"], "open");
    assert_eq!(incident["linkedAlertIds"], json!([]));
    let id = incident["id"].as_i64().unwrap();

    let response = mutate(&server, "incidents.updateStatus", json!({ "id": id, "status": "closed" })).await;
    assert_eq!(data(&response), json!({ "success": true }));

    let fetched = data(&query(&server, "incidents.getById", Some(json!({ "id": id }))).await);
    assert!(fetched["closedAt"].is_string());

    let stats = data(&query(&server, "incidents.stats", None).await);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["closed"], 1);
    assert_eq!(stats["open"], 0);
}

#[tokio::test]
async fn test_settings_upsert() {
    let server = create_test_server().await;

    let response = admin_mutate(
        &server,
        "settings.set",
        json!({ "key": "map.refreshSeconds", "value": 5, "description": "Map refresh" }),
    )
    .await;
    response.assert_status_ok();

    let response = admin_mutate(&server, "settings.set", json!({ "key": "map.refreshSeconds", "value": 10 })).await;
    let entry = data(&response);
    assert_eq!(entry["value"], 10);
    assert_eq!(entry["description"], "Map refresh");

    let list = data(&admin_query(&server, "settings.list", None).await);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let missing = data(&admin_query(&server, "settings.get", Some(json!({ "key": "nope" }))).await);
    assert_eq!(missing, Value::Null);
}

#[tokio::test]
async fn test_login_records_user() {
    let server = create_test_server().await;

    let response = mutate(&server, "auth.demoLogin", json!({ "username": "admin", "password": "admin" })).await;
    response.assert_status_ok();

    let audit = data(&admin_query(&server, "audit.list", None).await);
    let entries = audit.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "auth.demoLogin");
    assert_eq!(entries[0]["entityType"], "user");
}

#[tokio::test]
async fn test_equipment_list_filters() {
    let server = create_seeded_server().await;

    let sensors = rows(&query(&server, "sensors.list", None).await);
    assert!(!sensors.is_empty());
    let building_id = sensors[0]["buildingId"].clone();
    let floor_id = sensors[0]["floorId"].clone();
    let sensor_type = sensors[0]["type"].clone();

    let filtered = rows(&query(&server, "sensors.list", Some(json!({ "buildingId": building_id }))).await);
    assert!(!filtered.is_empty() && filtered.len() < sensors.len());
    assert!(filtered.iter().all(|s| s["buildingId"] == building_id));

    let filtered = rows(
        &query(&server, "sensors.list", Some(json!({ "floorId": floor_id, "type": sensor_type }))).await,
    );
    assert!(!filtered.is_empty());
    assert!(filtered.iter().all(|s| s["floorId"] == floor_id && s["type"] == sensor_type));

    for path in ["accessReaders.list", "wifiAccessPoints.list"] {
        let all = rows(&query(&server, path, None).await);
        assert!(!all.is_empty(), "{}", path);
        let building_id = all[0]["buildingId"].clone();
        let floor_id = all[0]["floorId"].clone();

        let by_building = rows(&query(&server, path, Some(json!({ "buildingId": building_id }))).await);
        assert!(by_building.len() < all.len(), "{}", path);
        assert!(by_building.iter().all(|r| r["buildingId"] == building_id), "{}", path);

        let by_floor = rows(&query(&server, path, Some(json!({ "floorId": floor_id }))).await);
        assert!(!by_floor.is_empty(), "{}", path);
        assert!(by_floor.iter().all(|r| r["floorId"] == floor_id), "{}", path);
    }
}

#[tokio::test]
async fn test_entity_list_filters() {
    let server = create_seeded_server().await;

    let all = rows(&query(&server, "entities.list", None).await);
    assert_eq!(all.len(), 60);

    let role = all[0]["role"].clone();
    let by_role = rows(&query(&server, "entities.list", Some(json!({ "role": role }))).await);
    assert!(!by_role.is_empty());
    assert!(by_role.iter().all(|e| e["role"] == role));

    let flagged = rows(&query(&server, "entities.list", Some(json!({ "isWatchlist": true }))).await);
    let cleared = rows(&query(&server, "entities.list", Some(json!({ "isWatchlist": false }))).await);
    assert!(flagged.iter().all(|e| e["isWatchlist"] == true));
    assert!(cleared.iter().all(|e| e["isWatchlist"] == false));
    assert_eq!(flagged.len() + cleared.len(), all.len());
}

#[tokio::test]
async fn test_oversized_paging_and_history_windows() {
    let server = create_seeded_server().await;

    let response = query(&server, "cameras.grid", Some(json!({ "page": u64::MAX, "pageSize": 9 }))).await;
    response.assert_status_ok();
    let grid = data(&response);
    assert_eq!(grid["cameras"], json!([]));
    assert_eq!(grid["page"], u64::MAX);
    assert!(grid["pageCount"].as_u64().unwrap() > 0);
    assert!(grid["total"].as_u64().unwrap() > 0);

    let page_count = grid["pageCount"].as_u64().unwrap();
    let last = data(&query(&server, "cameras.grid", Some(json!({ "page": page_count }))).await);
    assert!(!last["cameras"].as_array().unwrap().is_empty());

    let entities = rows(&query(&server, "entities.list", None).await);
    let entity_id = entities[0]["id"].clone();
    let response = query(
        &server,
        "entities.getLocationHistory",
        Some(json!({ "entityId": entity_id, "minutes": 1_000_000_000_000_i64 })),
    )
    .await;
    response.assert_status_ok();
    assert!(data(&response).is_array());

    let response = query(
        &server,
        "entities.getLocationHistory",
        Some(json!({ "entityId": entity_id, "minutes": i64::MAX })),
    )
    .await;
    response.assert_status_ok();
}
