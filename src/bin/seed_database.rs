// 写入演示数据（清空已有演示数据后重新生成）
//
// 用法: seed_database [--seed N] [配置文件路径]

use std::path::PathBuf;
use eli_lib::services::domain::{seed_demo_data, SeedOptions};
use eli_lib::services::infrastructure::database::{connect, setup_schema};
use eli_lib::utils::load_app_config;

fn parse_args() -> Result<(Option<u64>, Option<PathBuf>), Box<dyn std::error::Error>> {
    let mut rng_seed = None;
    let mut config_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let value = args.next().ok_or("--seed 需要一个数值参数")?;
            rng_seed = Some(value.parse::<u64>()?);
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }
    Ok((rng_seed, config_path))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌱 Seeding Brown University ELI demo data...");

    let (rng_seed, config_path) = parse_args()?;
    let config = load_app_config(config_path)?;

    if config.database.url.trim().is_empty() {
        eprintln!("❌ 未配置数据库连接串，请设置 DATABASE_URL");
        std::process::exit(1);
    }

    let conn = connect(&config.database).await?;
    setup_schema(&conn).await?;

    let options = SeedOptions {
        rng_seed,
        ..SeedOptions::default()
    };
    let summary = seed_demo_data(&conn, &options).await?;

    println!("✅ Seed completed successfully!");
    println!("{}", summary);

    conn.close().await?;
    Ok(())
}
