//! # RPC 过程调用
//!
//! 路由 `/api/trpc/{procedure}`：
//! - query 使用 GET，输入为查询参数 `input` 中的 JSON（缺省为 null）
//! - mutation 使用 POST，输入为 JSON 请求体（空请求体为 null）
//!
//! 成功响应 `{"result":{"data":...}}`，失败响应见 [`RpcError`]

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use super::context::RequestContext;
use super::error::RpcError;
use super::procedures;
use super::state::AppState;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }

    fn http_method(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "GET",
            ProcedureKind::Mutation => "POST",
        }
    }
}

/// 过程的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Admin,
}

#[derive(Debug, Clone, Copy)]
pub struct ProcedureDef {
    pub path: &'static str,
    pub kind: ProcedureKind,
    pub access: Access,
}

const fn query(path: &'static str) -> ProcedureDef {
    ProcedureDef { path, kind: ProcedureKind::Query, access: Access::Public }
}

const fn mutation(path: &'static str) -> ProcedureDef {
    ProcedureDef { path, kind: ProcedureKind::Mutation, access: Access::Public }
}

const fn admin(def: ProcedureDef) -> ProcedureDef {
    ProcedureDef { access: Access::Admin, ..def }
}

/// 全部过程
pub const PROCEDURES: &[ProcedureDef] = &[
    query("system.health"),
    admin(mutation("system.notifyOwner")),
    query("auth.me"),
    mutation("auth.logout"),
    mutation("auth.demoLogin"),
    query("buildings.list"),
    query("buildings.getById"),
    mutation("buildings.create"),
    query("floors.list"),
    query("floors.getById"),
    query("zones.list"),
    query("cameras.list"),
    query("cameras.getById"),
    mutation("cameras.updateStatus"),
    query("cameras.stats"),
    query("cameras.grid"),
    query("sensors.list"),
    query("accessReaders.list"),
    query("wifiAccessPoints.list"),
    query("entities.list"),
    query("entities.getById"),
    query("entities.getLocationHistory"),
    query("entities.stats"),
    query("locations.current"),
    mutation("locations.record"),
    query("alerts.list"),
    query("alerts.getById"),
    mutation("alerts.updateStatus"),
    mutation("alerts.create"),
    query("alerts.stats"),
    query("incidents.list"),
    query("incidents.getById"),
    mutation("incidents.create"),
    mutation("incidents.updateStatus"),
    query("incidents.stats"),
    query("events.list"),
    query("dashboard.overview"),
    admin(query("settings.list")),
    admin(query("settings.get")),
    admin(mutation("settings.set")),
    query("scenarios.list"),
    admin(mutation("scenarios.activate")),
    admin(query("audit.list")),
];

pub fn find_procedure(path: &str) -> Option<&'static ProcedureDef> {
    PROCEDURES.iter().find(|p| p.path == path)
}

/// 把输入反序列化为具体类型，失败时返回 BAD_REQUEST
pub fn parse_input<T: DeserializeOwned>(input: Value) -> AppResult<T> {
    serde_json::from_value(input).map_err(|e| AppError::validation_error(e.to_string()))
}

/// 整体可省略的输入：null 视为默认值
pub fn parse_optional_input<T: DeserializeOwned + Default>(input: Value) -> AppResult<T> {
    parse_input::<Option<T>>(input).map(Option::unwrap_or_default)
}

pub fn to_data<T: Serialize>(value: T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// GET /api/trpc/{procedure}
pub async fn handle_query(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let input = match params.get("input") {
        None => Ok(Value::Null),
        Some(raw) if raw.trim().is_empty() => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).map_err(|e| AppError::validation_error(e.to_string())),
    };
    call_procedure(&state, &headers, path, ProcedureKind::Query, input).await
}

/// POST /api/trpc/{procedure}
pub async fn handle_mutation(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::validation_error(e.to_string()))
    };
    call_procedure(&state, &headers, path, ProcedureKind::Mutation, input).await
}

async fn call_procedure(
    state: &AppState,
    headers: &HeaderMap,
    path: String,
    kind: ProcedureKind,
    input: AppResult<Value>,
) -> Response {
    let Some(def) = find_procedure(&path) else {
        let message = format!("No \"{}\"-procedure on path \"{}\"", kind.as_str(), path);
        return RpcError::new(AppError::not_found_error("Procedure", message), path).into_response();
    };

    if def.kind != kind {
        let message = format!(
            "Unsupported {}-request to {} procedure at path \"{}\"",
            kind.http_method(),
            def.kind.as_str(),
            path
        );
        return RpcError::new(AppError::method_not_supported(message), path).into_response();
    }

    let mut ctx = RequestContext::from_headers(headers, &state.session);
    let result = async {
        if def.access == Access::Admin {
            ctx.require_admin()?;
        }
        procedures::dispatch(state, &mut ctx, def.path, input?).await
    }
    .await;

    match result {
        Ok(data) => {
            let mut response = Json(json!({ "result": { "data": data } })).into_response();
            for cookie in &ctx.response_cookies {
                if let Ok(value) = HeaderValue::from_str(cookie) {
                    response.headers_mut().append(SET_COOKIE, value);
                }
            }
            response
        }
        Err(e) => RpcError::new(e, path).into_response(),
    }
}
