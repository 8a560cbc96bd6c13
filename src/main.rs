// ELI 校园安防演示平台 - HTTP 服务入口
//
// 用法: eli-server [配置文件路径]

use anyhow::Context;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use eli_lib::logging::init_logger;
use eli_lib::services::domain::LocationSimulator;
use eli_lib::services::{BaseService, DatabaseHandle};
use eli_lib::utils::load_app_config;
use eli_lib::{run_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_app_config(config_path).context("加载配置失败")?;

    init_logger(&config.logging);
    log::info!(
        "=== {} 启动 (环境: {}) ===",
        config.app_settings.app_name,
        config.app_settings.environment
    );

    let mut db = DatabaseHandle::from_config(&config.database)
        .await
        .context("连接数据库失败")?;
    db.initialize().await.context("初始化数据库失败")?;

    let cancel = CancellationToken::new();
    let simulator = if config.simulation.enabled && db.is_available() {
        Some(LocationSimulator::new(db.clone(), config.simulation.clone()).spawn(cancel.child_token()))
    } else {
        None
    };

    let state = AppState::new(config, db.clone()).context("创建应用状态失败")?;

    let shutdown = cancel.clone();
    run_server(state, async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("❌ 监听退出信号失败: {}", e);
        }
        log::info!("收到退出信号，正在关闭服务...");
        shutdown.cancel();
    })
    .await
    .context("HTTP 服务异常退出")?;

    cancel.cancel();
    if let Some(handle) = simulator {
        if let Err(e) = handle.await {
            log::error!("❌ 位置模拟任务异常结束: {}", e);
        }
    }
    db.shutdown().await.context("关闭数据库失败")?;

    Ok(())
}
