use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序统一错误类型
/// 用于封装系统中可能出现的各种错误，提供统一的错误处理机制
///
/// 每个变体同时携带两层信息：
/// - `error_code()`：内部错误代码，用于日志与排障
/// - `rpc_code()` / `http_status()`：对外暴露的 RPC 错误码和 HTTP 状态码
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// 通用错误，包含错误消息
    #[error("通用错误: {message}")]
    Generic { message: String },

    /// 输入/输出错误
    #[error("IO错误: {message} (Kind: {kind})")]
    IoError { message: String, kind: String },

    /// 数据持久化相关错误（SQL执行失败、连接中断等）
    #[error("持久化错误: {message}")]
    PersistenceError { message: String },

    /// 未配置数据库连接
    ///
    /// **业务含义**: 演示环境允许在没有数据库的情况下启动，
    /// 此时查询类过程返回空结果，而写入类过程统一返回该错误
    #[error("数据库不可用: {message}")]
    DatabaseUnavailable { message: String },

    /// JSON序列化/反序列化错误
    #[error("JSON序列化/反序列化错误: {message}")]
    JsonError { message: String },

    /// 配置相关错误
    #[error("配置错误: {message}")]
    ConfigurationError { message: String },

    /// 验证错误（请求参数校验失败）
    #[error("验证错误: {message}")]
    ValidationError { message: String },

    /// 资源未找到错误
    #[error("资源未找到: {resource_type} - {message}")]
    NotFoundError {
        resource_type: String,
        message: String,
    },

    /// 请求方法不被支持（例如用 GET 调用 mutation）
    #[error("请求方法不支持: {message}")]
    MethodNotSupported { message: String },

    /// 外部服务缺少必要配置（例如通知服务地址或密钥）
    ///
    /// 消息为固定的英文提示，会原样返回给客户端
    #[error("外部服务未配置: {message}")]
    ServiceNotConfigured { message: String },

    /// 网络相关错误（外部通知服务等）
    #[error("网络错误: {message}")]
    NetworkError { message: String },

    /// 用户认证错误
    #[error("用户认证错误: {message}")]
    AuthenticationError { message: String },

    /// 权限验证错误
    #[error("权限验证错误: {message}")]
    AuthorizationError { message: String },

    /// 服务初始化失败错误
    #[error("服务初始化失败: {service_name}, 原因: {reason}")]
    ServiceInitializationError { service_name: String, reason: String },
}

/// 未登录时返回给客户端的固定消息
pub const UNAUTHED_ERR_MSG: &str = "Please login (10001)";
/// 非管理员调用管理员过程时返回的固定消息
pub const NOT_ADMIN_ERR_MSG: &str = "You do not have required permission (10002)";
/// 演示登录凭证错误
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid credentials";
/// 数据库未配置
pub const DATABASE_UNAVAILABLE_MSG: &str = "Database not available";
/// 内部错误对客户端的固定消息
pub const INTERNAL_ERR_MSG: &str = "Internal server error";

impl AppError {
    /// 创建通用错误
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// 创建IO错误
    pub fn io_error(message: impl Into<String>, kind_str: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
            kind: kind_str.into(),
        }
    }

    /// 创建持久化错误
    pub fn persistence_error(message: impl Into<String>) -> Self {
        Self::PersistenceError {
            message: message.into(),
        }
    }

    /// 创建"数据库不可用"错误，消息固定为 `Database not available`
    pub fn database_unavailable() -> Self {
        Self::DatabaseUnavailable {
            message: DATABASE_UNAVAILABLE_MSG.to_string(),
        }
    }

    /// 创建外部服务未配置错误
    pub fn service_not_configured(message: impl Into<String>) -> Self {
        Self::ServiceNotConfigured {
            message: message.into(),
        }
    }

    /// 创建JSON错误
    pub fn json_error(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }

    /// 创建配置错误
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found_error(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// 创建请求方法不支持错误
    pub fn method_not_supported(message: impl Into<String>) -> Self {
        Self::MethodNotSupported {
            message: message.into(),
        }
    }

    /// 创建网络错误
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// 创建用户认证错误
    pub fn authentication_error(message: impl Into<String>) -> Self {
        Self::AuthenticationError {
            message: message.into(),
        }
    }

    /// 创建权限验证错误
    pub fn authorization_error(message: impl Into<String>) -> Self {
        Self::AuthorizationError {
            message: message.into(),
        }
    }

    /// 创建服务初始化失败错误
    pub fn service_initialization_error(service_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ServiceInitializationError {
            service_name: service_name.into(),
            reason: reason.into(),
        }
    }

    /// 获取错误的简短描述
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Generic { .. } => "GENERIC",
            AppError::IoError { .. } => "IO_ERROR",
            AppError::PersistenceError { .. } => "PERSISTENCE_ERROR",
            AppError::DatabaseUnavailable { .. } => "DATABASE_UNAVAILABLE",
            AppError::ServiceNotConfigured { .. } => "SERVICE_NOT_CONFIGURED",
            AppError::JsonError { .. } => "JSON_ERROR",
            AppError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::NotFoundError { .. } => "NOT_FOUND_ERROR",
            AppError::MethodNotSupported { .. } => "METHOD_NOT_SUPPORTED",
            AppError::NetworkError { .. } => "NETWORK_ERROR",
            AppError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            AppError::AuthorizationError { .. } => "AUTHORIZATION_ERROR",
            AppError::ServiceInitializationError { .. } => "SERVICE_INIT_ERROR",
        }
    }

    /// 对外暴露的 RPC 错误码
    pub fn rpc_code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "BAD_REQUEST",
            AppError::AuthenticationError { .. } => "UNAUTHORIZED",
            AppError::AuthorizationError { .. } => "FORBIDDEN",
            AppError::NotFoundError { .. } => "NOT_FOUND",
            AppError::MethodNotSupported { .. } => "METHOD_NOT_SUPPORTED",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 与 RPC 错误码对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self.rpc_code() {
            "BAD_REQUEST" => 400,
            "UNAUTHORIZED" => 401,
            "FORBIDDEN" => 403,
            "NOT_FOUND" => 404,
            "METHOD_NOT_SUPPORTED" => 405,
            _ => 500,
        }
    }

    /// 返回给客户端的消息（不带中文前缀）
    ///
    /// 内部错误统一返回 [`INTERNAL_ERR_MSG`]，详细信息只写入日志
    pub fn client_message(&self) -> String {
        match self {
            AppError::DatabaseUnavailable { message }
            | AppError::ServiceNotConfigured { message }
            | AppError::ValidationError { message }
            | AppError::NotFoundError { message, .. }
            | AppError::MethodNotSupported { message }
            | AppError::AuthenticationError { message }
            | AppError::AuthorizationError { message } => message.clone(),
            AppError::Generic { .. }
            | AppError::IoError { .. }
            | AppError::PersistenceError { .. }
            | AppError::JsonError { .. }
            | AppError::ConfigurationError { .. }
            | AppError::NetworkError { .. }
            | AppError::ServiceInitializationError { .. } => INTERNAL_ERR_MSG.to_string(),
        }
    }
}

/// 标准 I/O 错误到 AppError 的转换
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError { message: err.to_string(), kind: format!("{:?}", err.kind()) }
    }
}

/// serde_json 错误到 AppError 的转换
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError { message: err.to_string() }
    }
}

/// SeaORM 数据库错误到 AppError 的转换
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::PersistenceError { message: err.to_string() }
    }
}

/// 配置加载错误到 AppError 的转换
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigurationError { message: err.to_string() }
    }
}

/// reqwest 错误到 AppError 的转换
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError { message: err.to_string() }
    }
}

/// bcrypt 错误到 AppError 的转换
impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Generic { message: format!("bcrypt error: {}", err) }
    }
}

/// 字符串错误到 AppError 的转换（通用错误）
impl From<String> for AppError {
    fn from(err_msg: String) -> Self {
        Self::Generic { message: err_msg }
    }
}

/// &str 错误到 AppError 的转换（通用错误）
impl From<&str> for AppError {
    fn from(err_msg: &str) -> Self {
        Self::Generic { message: err_msg.to_string() }
    }
}

/// 应用程序结果类型别名
/// 简化错误处理的类型定义
pub type AppResult<T> = Result<T, AppError>;
