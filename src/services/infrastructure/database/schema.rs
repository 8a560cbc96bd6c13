// 表结构初始化与演示数据清理

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use sea_orm::sea_query::TableCreateStatement;
use crate::models::entities;
use crate::utils::error::{AppError, AppResult};

/// 按外键依赖顺序生成所有建表语句（被引用的表在前）
fn create_statements(schema: &Schema) -> Vec<(&'static str, TableCreateStatement)> {
    vec![
        ("users", schema.create_table_from_entity(entities::users::Entity).if_not_exists().to_owned()),
        ("buildings", schema.create_table_from_entity(entities::buildings::Entity).if_not_exists().to_owned()),
        ("floors", schema.create_table_from_entity(entities::floors::Entity).if_not_exists().to_owned()),
        ("zones", schema.create_table_from_entity(entities::zones::Entity).if_not_exists().to_owned()),
        ("cameras", schema.create_table_from_entity(entities::cameras::Entity).if_not_exists().to_owned()),
        ("access_readers", schema.create_table_from_entity(entities::access_readers::Entity).if_not_exists().to_owned()),
        ("sensors", schema.create_table_from_entity(entities::sensors::Entity).if_not_exists().to_owned()),
        ("wifi_access_points", schema.create_table_from_entity(entities::wifi_access_points::Entity).if_not_exists().to_owned()),
        ("tracked_entities", schema.create_table_from_entity(entities::tracked_entities::Entity).if_not_exists().to_owned()),
        ("location_events", schema.create_table_from_entity(entities::location_events::Entity).if_not_exists().to_owned()),
        ("events", schema.create_table_from_entity(entities::events::Entity).if_not_exists().to_owned()),
        ("alerts", schema.create_table_from_entity(entities::alerts::Entity).if_not_exists().to_owned()),
        ("incidents", schema.create_table_from_entity(entities::incidents::Entity).if_not_exists().to_owned()),
        ("config", schema.create_table_from_entity(entities::config_entries::Entity).if_not_exists().to_owned()),
        ("audit_logs", schema.create_table_from_entity(entities::audit_logs::Entity).if_not_exists().to_owned()),
        ("demo_scenarios", schema.create_table_from_entity(entities::demo_scenarios::Entity).if_not_exists().to_owned()),
    ]
}

/// 初始化数据库表结构
/// 创建所有必要的表 (如果它们不存在)
pub async fn setup_schema(db: &DatabaseConnection) -> AppResult<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    for (table, stmt) in create_statements(&schema) {
        db.execute(backend.build(&stmt))
            .await
            .map_err(|e| AppError::persistence_error(format!("创建 {} 表失败: {}", table, e)))?;
    }

    log::info!("数据库表结构设置完成或已存在。");
    Ok(())
}

/// 清空演示数据（子表在前），保留 users / config / audit_logs / demo_scenarios
pub async fn clear_demo_data<C>(db: &C) -> AppResult<()>
where
    C: ConnectionTrait,
{
    macro_rules! clear {
        ($entity:ty, $table:expr) => {
            <$entity as EntityTrait>::delete_many()
                .exec(db)
                .await
                .map_err(|e| AppError::persistence_error(format!("清空 {} 表失败: {}", $table, e)))?;
        };
    }

    clear!(entities::location_events::Entity, "location_events");
    clear!(entities::events::Entity, "events");
    clear!(entities::alerts::Entity, "alerts");
    clear!(entities::incidents::Entity, "incidents");
    clear!(entities::tracked_entities::Entity, "tracked_entities");
    clear!(entities::zones::Entity, "zones");
    clear!(entities::cameras::Entity, "cameras");
    clear!(entities::sensors::Entity, "sensors");
    clear!(entities::access_readers::Entity, "access_readers");
    clear!(entities::wifi_access_points::Entity, "wifi_access_points");
    clear!(entities::floors::Entity, "floors");
    clear!(entities::buildings::Entity, "buildings");

    log::info!("演示数据已清空。");
    Ok(())
}
