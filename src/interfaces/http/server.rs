//! HTTP 服务装配与启动

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use super::middleware::log_requests;
use super::rpc::{handle_mutation, handle_query};
use super::state::AppState;
use crate::utils::config::ServerConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::{now_utc, to_rfc3339};

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": to_rfc3339(now_utc()),
    }))
}

/// 创建完整路由：健康检查、RPC、可选的单页应用静态文件
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let mut router = Router::new()
        .route("/api/health", get(health))
        .route("/api/trpc/:procedure", get(handle_query).post(handle_mutation))
        .with_state(state);

    if let Some(dir) = server.static_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        let index = Path::new(dir).join("index.html");
        log::info!("提供静态文件目录: {}", dir);
        router = router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
    }

    router = router
        .layer(DefaultBodyLimit::max(server.body_limit_mb.saturating_mul(1024 * 1024)))
        .layer(axum::middleware::from_fn(log_requests));

    if server.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// 监听地址
pub fn bind_address(config: &ServerConfig) -> AppResult<SocketAddr> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::configuration_error(format!("无效的监听地址 {}:{}: {}", config.host, config.port, e)))
}

/// 启动 HTTP 服务，`shutdown` 完成后优雅退出
pub async fn run_server<F>(state: AppState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = bind_address(&state.config.server)?;
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    log::info!("🚀 [SERVER] 服务已启动: http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("🛑 [SERVER] 服务已停止");
    Ok(())
}
