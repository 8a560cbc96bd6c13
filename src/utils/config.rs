use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::utils::error::{AppError, AppResult};

/// 内置的演示 JWT 密钥（生产环境必须通过 JWT_SECRET 覆盖）
pub const DEFAULT_JWT_SECRET: &str = "brown-eli-demo-secret-key-2024";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/eli.toml";

/// 应用程序主配置结构
/// 包含应用程序运行所需的所有配置信息
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 应用程序基本设置
    pub app_settings: AppSettings,
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 会话认证配置
    pub auth: AuthConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 所有者通知服务配置
    pub notification: NotificationConfig,
    /// 位置模拟配置
    pub simulation: SimulationConfig,
}

/// 应用程序基本设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 应用程序名称
    pub app_name: String,
    /// 运行环境 (development, testing, production)
    pub environment: String,
    /// 是否启用调试模式
    pub debug_mode: bool,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 是否启用 CORS
    pub enable_cors: bool,
    /// 请求体大小上限（MB）
    pub body_limit_mb: usize,
    /// 单页应用静态文件目录，未设置时不提供静态文件
    pub static_dir: Option<String>,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接串，为空表示数据库不可用
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 是否输出 sqlx 语句日志
    pub sqlx_logging: bool,
    /// 启动时自动建表
    pub auto_migrate: bool,
}

/// 会话认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 签名密钥
    pub jwt_secret: String,
    /// 会话有效期（秒）
    pub session_ttl_secs: u64,
    /// 会话 Cookie 名称
    pub cookie_name: String,
    /// 兼容旧版本的 Cookie 名称
    pub legacy_cookie_name: String,
    /// 演示账号用户名
    pub demo_username: String,
    /// 演示账号密码
    pub demo_password: String,
    /// 演示账号显示名称
    pub demo_display_name: String,
    /// 演示账号邮箱
    pub demo_email: String,
    /// bcrypt 计算成本
    pub bcrypt_cost: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub log_level: String,
}

/// 所有者通知服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Forge API 基础地址
    pub forge_api_url: String,
    /// Forge API 密钥
    pub forge_api_key: String,
    /// 请求超时（毫秒）
    pub timeout_ms: u64,
}

/// 位置模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 是否启动后台位置模拟
    pub enabled: bool,
    /// 模拟步进间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 移动速度（像素/毫秒）
    pub speed: f64,
    /// 每次步进移动的实体数量上限
    pub entity_batch_size: u64,
    /// 楼层平面宽度（像素）
    pub floor_width: f64,
    /// 楼层平面高度（像素）
    pub floor_height: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "ELI Campus Security".to_string(),
            environment: "development".to_string(),
            debug_mode: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            body_limit_mb: 50,
            static_dir: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 8,
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            session_ttl_secs: 24 * 60 * 60,
            cookie_name: "app_session_id".to_string(),
            legacy_cookie_name: "demo_token".to_string(),
            demo_username: "admin".to_string(),
            demo_password: "admin".to_string(),
            demo_display_name: "Demo Administrator".to_string(),
            demo_email: "admin@brown.edu".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            forge_api_url: String::new(),
            forge_api_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_interval_ms: 2000,
            speed: 0.05,
            entity_batch_size: 50,
            floor_width: 1000.0,
            floor_height: 800.0,
        }
    }
}

impl AppConfig {
    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_settings.environment == "production"
    }

    /// 是否配置了数据库
    pub fn has_database(&self) -> bool {
        !self.database.url.trim().is_empty()
    }
}

/// 配置管理器
/// 负责按层级加载、校验应用程序配置
///
/// 加载顺序（后者覆盖前者）：
/// 1. 内置默认值
/// 2. 可选的配置文件（toml/json/yaml，按扩展名识别）
/// 3. `ELI_*` 环境变量，层级用 `__` 分隔，例如 `ELI_SERVER__PORT`
/// 4. 兼容的旧环境变量（`JWT_SECRET`、`DATABASE_URL`、`PORT` 等）
pub struct ConfigManager {
    config: AppConfig,
    config_file_path: PathBuf,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new(config_file_path: PathBuf) -> Self {
        Self {
            config: AppConfig::default(),
            config_file_path,
        }
    }

    /// 从默认值、配置文件和 `ELI_*` 环境变量加载配置
    pub fn load(&mut self) -> AppResult<()> {
        self.load_with_env(None)
    }

    /// 加载配置，`env` 为 `None` 时读取进程环境变量
    pub fn load_with_env(&mut self, env: Option<HashMap<String, String>>) -> AppResult<()> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| AppError::configuration_error(format!("构建默认配置失败: {}", e)))?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(self.config_file_path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("ELI")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| AppError::configuration_error(format!("加载配置失败: {}", e)))?;

        self.config = settings
            .try_deserialize()
            .map_err(|e| AppError::configuration_error(format!("解析配置失败: {}", e)))?;

        Ok(())
    }

    /// 从环境变量覆盖配置（兼容旧部署的变量名）
    pub fn override_from_env(&mut self) {
        self.apply_env_overrides(|key| std::env::var(key).ok());
    }

    /// 使用给定的变量查询函数覆盖配置
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(secret) = non_empty("JWT_SECRET") {
            self.config.auth.jwt_secret = secret;
        }

        // NEON_DATABASE_URL 优先于 DATABASE_URL
        if let Some(url) = non_empty("NEON_DATABASE_URL").or_else(|| non_empty("DATABASE_URL")) {
            self.config.database.url = url;
        }

        if let Some(port) = non_empty("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.config.server.port = port,
                Err(_) => log::warn!("忽略无效的 PORT 环境变量: {}", port),
            }
        }

        if let Some(node_env) = non_empty("NODE_ENV") {
            if node_env == "production" {
                self.config.app_settings.environment = "production".to_string();
                self.config.app_settings.debug_mode = false;
            }
        }

        if let Some(log_level) = non_empty("LOG_LEVEL") {
            self.config.logging.log_level = log_level.to_lowercase();
        }

        if let Some(url) = non_empty("FORGE_API_URL") {
            self.config.notification.forge_api_url = url;
        }
        if let Some(key) = non_empty("FORGE_API_KEY") {
            self.config.notification.forge_api_key = key;
        }
    }

    /// 获取配置的只读引用
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取配置的可变引用
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 配置文件路径
    pub fn config_file_path(&self) -> &Path {
        &self.config_file_path
    }

    /// 验证配置的有效性
    pub fn validate_config(&self) -> AppResult<()> {
        if self.config.server.host.trim().is_empty() {
            return Err(AppError::configuration_error("服务监听地址不能为空"));
        }

        if self.config.server.port == 0 {
            return Err(AppError::configuration_error("服务端口号不能为0"));
        }

        let valid_environments = ["development", "testing", "production"];
        if !valid_environments.contains(&self.config.app_settings.environment.as_str()) {
            return Err(AppError::configuration_error(format!(
                "无效的环境配置: {}，有效值: {:?}",
                self.config.app_settings.environment, valid_environments
            )));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "warning", "error", "off"];
        if !valid_log_levels.contains(&self.config.logging.log_level.to_lowercase().as_str()) {
            return Err(AppError::configuration_error(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.config.logging.log_level, valid_log_levels
            )));
        }

        if self.config.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration_error("JWT 密钥不能为空"));
        }

        if self.config.auth.session_ttl_secs == 0 {
            return Err(AppError::configuration_error("会话有效期必须大于0"));
        }

        if !(4..=31).contains(&self.config.auth.bcrypt_cost) {
            return Err(AppError::configuration_error(format!(
                "无效的 bcrypt 成本: {}，有效范围: 4..=31",
                self.config.auth.bcrypt_cost
            )));
        }

        if self.config.simulation.tick_interval_ms == 0 {
            return Err(AppError::configuration_error("位置模拟间隔必须大于0"));
        }

        if self.config.is_production() && self.config.auth.jwt_secret == DEFAULT_JWT_SECRET {
            crate::log_config_warning!("生产环境仍在使用内置的演示 JWT 密钥，请设置 JWT_SECRET");
        }

        Ok(())
    }

    /// 重置为默认配置
    pub fn reset_to_default(&mut self) {
        self.config = AppConfig::default();
    }
}

/// 按完整顺序加载配置：默认值 → 文件 → `ELI_*` → 旧环境变量，最后校验
pub fn load_app_config(config_path: Option<PathBuf>) -> AppResult<AppConfig> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config_manager = ConfigManager::new(config_path);

    config_manager.load()?;
    config_manager.override_from_env();
    config_manager.validate_config()?;

    Ok(config_manager.get_config().clone())
}
