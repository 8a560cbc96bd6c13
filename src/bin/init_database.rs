// 初始化数据库表结构
//
// 用法: init_database [配置文件路径]
// 连接串取自配置文件或 DATABASE_URL / NEON_DATABASE_URL

use std::path::PathBuf;
use eli_lib::services::infrastructure::database::{connect, setup_schema};
use eli_lib::utils::load_app_config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 初始化数据库表结构 ===");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_app_config(config_path)?;

    if config.database.url.trim().is_empty() {
        eprintln!("❌ 未配置数据库连接串，请设置 DATABASE_URL");
        std::process::exit(1);
    }

    let conn = connect(&config.database).await?;
    println!("✅ 数据库连接成功");

    setup_schema(&conn).await?;
    println!("✅ 表结构已创建（已存在的表保持不变）");

    conn.close().await?;
    println!("🎉 数据库初始化完成");
    Ok(())
}
