#[cfg(test)]
mod tests {
    use crate::utils::error::{AppError, AppResult, DATABASE_UNAVAILABLE_MSG, INTERNAL_ERR_MSG};
    use crate::utils::config::{AppConfig, ConfigManager, DEFAULT_JWT_SECRET};
    use crate::utils::time_utils::minutes_ago;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// 测试AppError的创建和错误代码
    #[test]
    fn test_app_error_creation() {
        let error = AppError::generic("测试错误");
        assert_eq!(error.error_code(), "GENERIC");
        assert!(error.to_string().contains("测试错误"));

        let db_error = AppError::persistence_error("连接中断");
        assert_eq!(db_error.error_code(), "PERSISTENCE_ERROR");
        assert!(db_error.to_string().contains("连接中断"));

        let io_error = AppError::io_error("文件读取失败", "Unknown");
        assert_eq!(io_error.error_code(), "IO_ERROR");
        assert!(io_error.to_string().contains("文件读取失败"));
    }

    /// 测试错误到 RPC 错误码 / HTTP 状态码的映射
    #[test]
    fn test_wire_mapping() {
        let cases = vec![
            (AppError::validation_error("bad"), "BAD_REQUEST", 400),
            (AppError::authentication_error("Please login (10001)"), "UNAUTHORIZED", 401),
            (AppError::authorization_error("nope"), "FORBIDDEN", 403),
            (AppError::not_found_error("Camera", "missing"), "NOT_FOUND", 404),
            (AppError::method_not_supported("GET"), "METHOD_NOT_SUPPORTED", 405),
            (AppError::database_unavailable(), "INTERNAL_SERVER_ERROR", 500),
            (AppError::persistence_error("boom"), "INTERNAL_SERVER_ERROR", 500),
            (AppError::network_error("timeout"), "INTERNAL_SERVER_ERROR", 500),
            (AppError::service_not_configured("missing"), "INTERNAL_SERVER_ERROR", 500),
        ];

        for (error, code, status) in cases {
            assert_eq!(error.rpc_code(), code, "{:?}", error);
            assert_eq!(error.http_status(), status, "{:?}", error);
        }
    }

    /// 客户端消息不带中文前缀
    #[test]
    fn test_client_message() {
        let error = AppError::database_unavailable();
        assert_eq!(error.client_message(), DATABASE_UNAVAILABLE_MSG);
        assert!(error.to_string().starts_with("数据库不可用"));

        let error = AppError::not_found_error("Alert", "Alert 42 not found");
        assert_eq!(error.client_message(), "Alert 42 not found");

        let error = AppError::service_not_configured("Notification service URL is not configured.");
        assert_eq!(error.client_message(), "Notification service URL is not configured.");
        assert_eq!(error.error_code(), "SERVICE_NOT_CONFIGURED");
    }

    /// 内部错误的细节只进入日志，不返回给客户端
    #[test]
    fn test_client_message_hides_internal_details() {
        let internal = vec![
            AppError::persistence_error("加载建筑列表失败: no such table: buildings"),
            AppError::generic("签发会话令牌失败: InvalidKeyFormat"),
            AppError::io_error("/srv/eli/config.toml: permission denied", "PermissionDenied"),
            AppError::configuration_error("无效的监听地址 0.0.0.0:abc"),
            AppError::network_error("error sending request for url (https://forge.internal/api)"),
            AppError::json_error("expected value at line 1 column 1"),
            AppError::service_initialization_error("Database", "password authentication failed"),
        ];

        for error in internal {
            assert_eq!(error.client_message(), INTERNAL_ERR_MSG, "{:?}", error);
            assert_eq!(error.http_status(), 500);
        }
    }

    /// 测试错误转换 (From trait)
    #[test]
    fn test_error_conversion() {
        let string_error: AppError = String::from("字符串错误").into();
        assert_eq!(string_error.error_code(), "GENERIC");

        let str_error: AppError = "字符串错误".into();
        assert_eq!(str_error.error_code(), "GENERIC");

        let json_error: Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{invalid json}");
        match json_error {
            Err(e) => {
                let app_error: AppError = e.into();
                assert_eq!(app_error.error_code(), "JSON_ERROR");
            }
            Ok(_) => panic!("应该产生JSON错误"),
        }

        let db_error: AppError = sea_orm::DbErr::Custom("oops".to_string()).into();
        assert_eq!(db_error.error_code(), "PERSISTENCE_ERROR");
        assert_eq!(db_error.http_status(), 500);

        let io_error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io_error.error_code(), "IO_ERROR");
        assert!(io_error.to_string().contains("NotFound"));
    }

    /// 测试应用配置的默认值
    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.app_settings.environment, "development");
        assert!(config.app_settings.debug_mode);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.body_limit_mb, 50);
        assert!(config.server.static_dir.is_none());

        assert!(!config.has_database());

        assert_eq!(config.auth.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.auth.session_ttl_secs, 86_400);
        assert_eq!(config.auth.cookie_name, "app_session_id");
        assert_eq!(config.auth.legacy_cookie_name, "demo_token");
        assert_eq!(config.auth.demo_username, "admin");

        assert_eq!(config.logging.log_level, "info");
        assert!(!config.simulation.enabled);
        assert_eq!(config.simulation.speed, 0.05);
    }

    /// 从 toml 文件加载配置
    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("eli.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
port = 8080
static_dir = "dist/public"

[database]
url = "sqlite::memory:"

[logging]
log_level = "debug"
"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new(config_path);
        manager.load_with_env(Some(HashMap::new())).unwrap();

        let config = manager.get_config();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir.as_deref(), Some("dist/public"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(config.auth.cookie_name, "app_session_id");
    }

    /// 配置文件不存在时使用默认值
    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(temp_dir.path().join("absent.toml"));
        manager.load_with_env(Some(HashMap::new())).unwrap();

        assert_eq!(manager.get_config().server.port, 3000);
        assert!(manager.validate_config().is_ok());
    }

    /// `ELI_*` 环境变量覆盖文件中的值
    #[test]
    fn test_prefixed_env_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("eli.toml");
        std::fs::write(&config_path, "[server]\nport = 8080\n").unwrap();

        let mut env = HashMap::new();
        env.insert("ELI_SERVER__PORT".to_string(), "9090".to_string());
        env.insert("ELI_SIMULATION__ENABLED".to_string(), "true".to_string());

        let mut manager = ConfigManager::new(config_path);
        manager.load_with_env(Some(env)).unwrap();

        assert_eq!(manager.get_config().server.port, 9090);
        assert!(manager.get_config().simulation.enabled);
    }

    /// 测试兼容环境变量覆盖
    #[test]
    fn test_legacy_env_override() {
        let mut env = HashMap::new();
        env.insert("JWT_SECRET", "s3cret");
        env.insert("DATABASE_URL", "postgres://plain");
        env.insert("NEON_DATABASE_URL", "postgres://neon");
        env.insert("PORT", "4000");
        env.insert("NODE_ENV", "production");
        env.insert("LOG_LEVEL", "WARN");
        env.insert("FORGE_API_URL", "https://forge.example");
        env.insert("FORGE_API_KEY", "key");

        let mut manager = ConfigManager::new(PathBuf::from("test.toml"));
        manager.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        let config = manager.get_config();
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.database.url, "postgres://neon");
        assert_eq!(config.server.port, 4000);
        assert!(config.is_production());
        assert_eq!(config.logging.log_level, "warn");
        assert_eq!(config.notification.forge_api_url, "https://forge.example");
        assert_eq!(config.notification.forge_api_key, "key");
        assert!(manager.validate_config().is_ok());
    }

    /// 只有 DATABASE_URL 时使用它；无效端口被忽略
    #[test]
    fn test_legacy_env_fallbacks() {
        let mut env = HashMap::new();
        env.insert("DATABASE_URL", "postgres://plain");
        env.insert("PORT", "not-a-port");
        env.insert("NODE_ENV", "staging");

        let mut manager = ConfigManager::new(PathBuf::from("test.toml"));
        manager.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        let config = manager.get_config();
        assert_eq!(config.database.url, "postgres://plain");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.app_settings.environment, "development");
    }

    /// 测试配置验证
    #[test]
    fn test_config_validation() {
        let mut manager = ConfigManager::new(PathBuf::from("test.toml"));
        assert!(manager.validate_config().is_ok());

        manager.get_config_mut().app_settings.environment = "invalid_env".to_string();
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().server.port = 0;
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().server.host = "".to_string();
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().logging.log_level = "verbose".to_string();
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().auth.jwt_secret = String::new();
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().auth.session_ttl_secs = 0;
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().auth.bcrypt_cost = 3;
        assert!(manager.validate_config().is_err());
        manager.reset_to_default();

        manager.get_config_mut().simulation.tick_interval_ms = 0;
        let err = manager.validate_config().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    /// 日志初始化能识别的级别都应通过校验
    #[test]
    fn test_config_accepts_logger_levels() {
        let mut manager = ConfigManager::new(PathBuf::from("test.toml"));
        for level in ["trace", "debug", "info", "warn", "warning", "error", "off", "WARNING", "Info"] {
            manager.get_config_mut().logging.log_level = level.to_string();
            assert!(manager.validate_config().is_ok(), "{}", level);
        }
    }

    /// 超大回溯窗口退回到纪元时间
    #[test]
    fn test_minutes_ago_saturates_at_epoch() {
        let epoch = DateTime::<Utc>::default();
        assert_eq!(minutes_ago(i64::MAX), epoch);
        assert_eq!(minutes_ago(1_000_000_000_000), epoch);
        assert_eq!(minutes_ago(60 * 24 * 365 * 100), epoch);

        let recent = minutes_ago(30);
        assert!(recent > epoch);
        assert!(recent < Utc::now());
    }

    /// 生产环境使用默认密钥只告警不报错
    #[test]
    fn test_production_default_secret_is_warning_only() {
        let mut manager = ConfigManager::new(PathBuf::from("test.toml"));
        manager.get_config_mut().app_settings.environment = "production".to_string();
        assert!(manager.validate_config().is_ok());
    }

    /// 测试AppResult类型别名
    #[test]
    fn test_app_result() {
        let success: AppResult<String> = Ok("成功".to_string());
        assert!(success.is_ok());

        let error: AppResult<String> = Err(AppError::generic("测试错误"));
        match error {
            Err(e) => assert_eq!(e.error_code(), "GENERIC"),
            Ok(_) => panic!("应该是错误"),
        }
    }
}
