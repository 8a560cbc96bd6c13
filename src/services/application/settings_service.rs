//! 系统设置服务（config 表的键值读写）

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use crate::models::entities::{config_entries, ConfigEntry};
use crate::models::structs::SetSettingInput;
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::error::{AppError, AppResult};
use super::persistence;

/// 设置键的最大长度
pub const MAX_SETTING_KEY_LENGTH: usize = 100;

#[derive(Clone)]
pub struct SettingsService {
    db: DatabaseHandle,
}

impl SettingsService {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }

    /// 所有设置，按键排序
    pub async fn list(&self) -> AppResult<Vec<ConfigEntry>> {
        let Some(conn) = self.db.connection() else {
            return Ok(Vec::new());
        };
        config_entries::Entity::find()
            .order_by_asc(config_entries::Column::Key)
            .all(conn)
            .await
            .map_err(persistence("加载系统设置失败"))
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<ConfigEntry>> {
        let Some(conn) = self.db.connection() else {
            return Ok(None);
        };
        config_entries::Entity::find()
            .filter(config_entries::Column::Key.eq(key))
            .one(conn)
            .await
            .map_err(persistence("加载系统设置失败"))
    }

    /// 写入或更新一项设置；未提供描述时保留原描述
    pub async fn set(&self, input: SetSettingInput) -> AppResult<ConfigEntry> {
        let conn = self.db.require()?;

        let key = input.key.trim();
        if key.is_empty() {
            return Err(AppError::validation_error("Setting key is required"));
        }
        if key.chars().count() > MAX_SETTING_KEY_LENGTH {
            return Err(AppError::validation_error(format!(
                "Setting key must be at most {} characters",
                MAX_SETTING_KEY_LENGTH
            )));
        }

        let existing = config_entries::Entity::find()
            .filter(config_entries::Column::Key.eq(key))
            .one(conn)
            .await
            .map_err(persistence("加载系统设置失败"))?;

        let saved = match existing {
            Some(entry) => {
                let mut active: config_entries::ActiveModel = entry.into();
                active.value = Set(input.value);
                if input.description.is_some() {
                    active.description = Set(input.description);
                }
                active.update(conn).await
            }
            None => {
                config_entries::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(input.value),
                    description: Set(input.description),
                    ..Default::default()
                }
                .insert(conn)
                .await
            }
        }
        .map_err(persistence("保存系统设置失败"))?;

        crate::log_user_operation!("系统设置已更新: {}", saved.key);
        Ok(saved)
    }
}
