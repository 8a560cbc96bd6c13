//! HTTP 请求日志中间件

use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 记录每个请求的方法、路径、状态码与耗时，并回写 `x-request-id`
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status();
    if status.is_server_error() {
        log::warn!("[HTTP] {} {} -> {} ({} ms) [{}]", method, path, status.as_u16(), elapsed_ms, request_id);
    } else {
        log::info!("[HTTP] {} {} -> {} ({} ms) [{}]", method, path, status.as_u16(), elapsed_ms, request_id);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
