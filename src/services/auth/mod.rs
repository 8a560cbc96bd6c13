//! 认证模块：演示账号登录与会话 Cookie

pub mod session_service;

pub use session_service::{parse_cookies, SessionClaims, SessionService, SessionUser};
