//! 单次 RPC 请求的上下文
//!
//! 由请求头构造：
//! - `cookie` → 会话用户
//! - `x-forwarded-for` 第一段 → 客户端 IP（写入审计日志）
//! - `x-forwarded-proto: https` → 登录 Cookie 附加 `Secure`

use axum::http::HeaderMap;
use crate::services::auth::{SessionService, SessionUser};
use crate::utils::error::{AppError, AppResult, NOT_ADMIN_ERR_MSG, UNAUTHED_ERR_MSG};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<SessionUser>,
    pub ip_address: Option<String>,
    pub secure: bool,
    /// 需要写回响应的 Set-Cookie 值
    pub response_cookies: Vec<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap, session: &SessionService) -> Self {
        let cookie_header = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok());

        Self {
            user: session.authenticate(cookie_header),
            ip_address: client_ip(headers),
            secure: is_secure_request(headers),
            response_cookies: Vec::new(),
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user.as_ref().map(|u| u.id)
    }

    /// 要求已登录
    pub fn require_user(&self) -> AppResult<&SessionUser> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::authentication_error(UNAUTHED_ERR_MSG))
    }

    /// 要求管理员；未登录时返回 401，非管理员返回 403
    pub fn require_admin(&self) -> AppResult<&SessionUser> {
        let user = self.require_user()?;
        if !user.is_admin() {
            crate::log_auth_failure!("用户 {} 无权调用管理员接口", user.open_id);
            return Err(AppError::authorization_error(NOT_ADMIN_ERR_MSG));
        }
        Ok(user)
    }

    pub fn set_cookie(&mut self, cookie: String) {
        self.response_cookies.push(cookie);
    }
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

fn is_secure_request(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|proto| {
            proto
                .split(',')
                .any(|p| p.trim().eq_ignore_ascii_case("https"))
        })
        .unwrap_or(false)
}
