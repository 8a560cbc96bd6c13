//! # 演示会话服务
//!
//! ## 业务说明
//! 演示环境只有一个内置账号。登录成功后签发 HS256 JWT，写入 `app_session_id` Cookie；
//! 后续请求从 Cookie 中解析会话并还原为固定的演示用户（id = 1）
//!
//! ## 令牌格式
//! `{ username, role, name, exp }`，有效期由 `auth.session_ttl_secs` 决定（默认 24 小时）

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::models::entities::users;
use crate::models::enums::UserRole;
use crate::models::structs::{DemoLoginInput, DemoLoginResponse, LoginUser};
use crate::services::infrastructure::database::DatabaseHandle;
use crate::utils::config::AuthConfig;
use crate::utils::error::{AppError, AppResult, INVALID_CREDENTIALS_MSG};

/// 演示用户的固定主键
pub const DEMO_USER_ID: i32 = 1;
/// 演示用户的固定外部标识
pub const DEMO_OPEN_ID: &str = "admin";
/// 演示用户的登录方式
pub const DEMO_LOGIN_METHOD: &str = "password";

/// JWT 载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub username: String,
    pub role: String,
    pub name: String,
    pub exp: i64,
}

/// 当前请求的用户（由会话还原）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub open_id: String,
    pub name: String,
    pub email: String,
    pub login_method: String,
    pub role: UserRole,
    pub last_signed_in: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionUser {
    /// 是否为管理员
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 解析 Cookie 请求头为键值表；重复的键保留第一次出现的值
pub fn parse_cookies(header: Option<&str>) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    let Some(header) = header else {
        return cookies;
    };

    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"');
        cookies.entry(name.to_string()).or_insert_with(|| value.to_string());
    }
    cookies
}

/// 演示会话服务
pub struct SessionService {
    config: AuthConfig,
    password_hash: String,
}

impl SessionService {
    /// 创建会话服务，演示密码在此时计算 bcrypt 哈希
    pub fn new(config: AuthConfig) -> AppResult<Self> {
        let password_hash = bcrypt::hash(&config.demo_password, config.bcrypt_cost)?;
        Ok(Self { config, password_hash })
    }

    /// 认证配置
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// 签发会话令牌
    pub fn create_session_token(&self, username: &str, role: &str, name: &str) -> AppResult<String> {
        let exp = Utc::now().timestamp() + self.config.session_ttl_secs as i64;
        let claims = SessionClaims {
            username: username.to_string(),
            role: role.to_string(),
            name: name.to_string(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::generic(format!("签发会话令牌失败: {}", e)))
    }

    /// 校验会话令牌；签名错误、过期或格式错误时返回 None 并记录告警
    pub fn verify_session(&self, token: Option<&str>) -> Option<SessionClaims> {
        let token = token.filter(|t| !t.is_empty())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                crate::log_auth_failure!("会话校验失败: {}", e);
                None
            }
        }
    }

    /// 由会话载荷还原演示用户
    pub fn user_from_claims(&self, claims: &SessionClaims) -> SessionUser {
        let now = Utc::now();
        SessionUser {
            id: DEMO_USER_ID,
            open_id: DEMO_OPEN_ID.to_string(),
            name: claims.name.clone(),
            email: self.config.demo_email.clone(),
            login_method: DEMO_LOGIN_METHOD.to_string(),
            role: claims.role.parse().unwrap_or(UserRole::User),
            last_signed_in: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// 从 Cookie 请求头认证当前请求
    ///
    /// 先读 `app_session_id`，不存在时回退到旧的 `demo_token`
    pub fn authenticate(&self, cookie_header: Option<&str>) -> Option<SessionUser> {
        let cookies = parse_cookies(cookie_header);
        let token = cookies
            .get(&self.config.cookie_name)
            .or_else(|| cookies.get(&self.config.legacy_cookie_name))
            .map(String::as_str);

        self.verify_session(token).map(|claims| self.user_from_claims(&claims))
    }

    /// 演示登录：用户名一致且密码通过 bcrypt 校验
    pub fn demo_login(&self, input: &DemoLoginInput) -> AppResult<DemoLoginResponse> {
        let password_ok = bcrypt::verify(&input.password, &self.password_hash).unwrap_or(false);
        if input.username != self.config.demo_username || !password_ok {
            crate::log_auth_failure!("演示登录失败，用户名: {}", input.username);
            return Err(AppError::authentication_error(INVALID_CREDENTIALS_MSG));
        }

        let role = UserRole::Admin.as_str();
        let name = self.config.demo_display_name.clone();
        let token = self.create_session_token(&input.username, role, &name)?;

        crate::log_user_operation!("用户 {} 登录成功", input.username);
        Ok(DemoLoginResponse {
            success: true,
            user: LoginUser {
                username: input.username.clone(),
                role: role.to_string(),
                name,
            },
            token,
        })
    }

    /// 登录成功时写入的 Set-Cookie 值
    pub fn session_cookie(&self, token: &str, secure: bool) -> String {
        cookie_string(&self.config.cookie_name, token, self.config.session_ttl_secs, secure)
    }

    /// 登出时的 Set-Cookie 值，同时清除会话 Cookie 和旧版 Cookie
    pub fn clear_cookies(&self, secure: bool) -> Vec<String> {
        let mut cookies = vec![cookie_string(&self.config.cookie_name, "", 0, secure)];
        if self.config.legacy_cookie_name != self.config.cookie_name {
            cookies.push(cookie_string(&self.config.legacy_cookie_name, "", 0, secure));
        }
        cookies
    }

    /// 在 users 表中记录本次登录（按 open_id 写入或更新）
    ///
    /// 数据库不可用或写入失败时只记录日志
    pub async fn record_login(&self, db: &DatabaseHandle, username: &str) {
        let Some(conn) = db.connection() else {
            return;
        };

        let result: AppResult<()> = async {
            let existing = users::Entity::find()
                .filter(users::Column::OpenId.eq(DEMO_OPEN_ID))
                .one(conn)
                .await?;

            let now = Utc::now();
            match existing {
                Some(model) => {
                    let mut active: users::ActiveModel = model.into();
                    active.username = Set(Some(username.to_string()));
                    active.name = Set(Some(self.config.demo_display_name.clone()));
                    active.last_signed_in = Set(now);
                    active.update(conn).await?;
                }
                None => {
                    let active = users::ActiveModel {
                        open_id: Set(DEMO_OPEN_ID.to_string()),
                        username: Set(Some(username.to_string())),
                        name: Set(Some(self.config.demo_display_name.clone())),
                        email: Set(Some(self.config.demo_email.clone())),
                        login_method: Set(Some(DEMO_LOGIN_METHOD.to_string())),
                        role: Set(UserRole::Admin),
                        last_signed_in: Set(now),
                        ..Default::default()
                    };
                    active.insert(conn).await?;
                }
            }
            Ok(())
        }
        .await;

        if let Err(e) = result {
            crate::log_database_failure!("记录登录信息失败: {}", e);
        }
    }
}

fn cookie_string(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=None; Max-Age={}", name, value, max_age);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        }
    }

    fn service() -> SessionService {
        SessionService::new(test_config()).unwrap()
    }

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies(Some("a=1; app_session_id=tok; b=\"quoted\"; junk; a=2"));
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
        assert_eq!(cookies.get("app_session_id").map(String::as_str), Some("tok"));
        assert_eq!(cookies.get("b").map(String::as_str), Some("quoted"));
        assert!(parse_cookies(None).is_empty());
    }

    #[test]
    fn test_token_round_trip() {
        let service = service();
        let token = service.create_session_token("admin", "admin", "Demo Administrator").unwrap();
        let claims = service.verify_session(Some(&token)).unwrap();
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > Utc::now().timestamp() + 86_000);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = SessionService::new(AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..test_config()
        })
        .unwrap();
        let token = other.create_session_token("admin", "admin", "x").unwrap();
        assert!(service().verify_session(Some(&token)).is_none());
        assert!(service().verify_session(Some("not-a-jwt")).is_none());
        assert!(service().verify_session(None).is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let claims = SessionClaims {
            username: "admin".to_string(),
            role: "admin".to_string(),
            name: "Demo Administrator".to_string(),
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();
        assert!(service().verify_session(Some(&token)).is_none());
    }

    #[test]
    fn test_authenticate_uses_legacy_cookie() {
        let service = service();
        let token = service.create_session_token("admin", "admin", "Demo Administrator").unwrap();

        let user = service.authenticate(Some(&format!("demo_token={}", token))).unwrap();
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.open_id, "admin");
        assert_eq!(user.email, "admin@brown.edu");
        assert_eq!(user.login_method, "password");
        assert!(user.is_admin());

        assert!(service.authenticate(Some("other=1")).is_none());
        assert!(service.authenticate(None).is_none());
    }

    #[test]
    fn test_non_admin_role_from_token() {
        let service = service();
        let token = service.create_session_token("viewer", "viewer", "Viewer").unwrap();
        let user = service.authenticate(Some(&format!("app_session_id={}", token))).unwrap();
        assert_eq!(user.role, UserRole::Viewer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_demo_login() {
        let service = service();
        let response = service
            .demo_login(&DemoLoginInput { username: "admin".to_string(), password: "admin".to_string() })
            .unwrap();
        assert!(response.success);
        assert_eq!(response.user.role, "admin");
        assert_eq!(response.user.name, "Demo Administrator");
        assert!(service.verify_session(Some(&response.token)).is_some());
    }

    #[test]
    fn test_invalid_credentials_are_rejected() {
        let service = service();
        for (username, password) in [("admin", "wrong"), ("root", "admin"), ("", "")] {
            let err = service
                .demo_login(&DemoLoginInput { username: username.to_string(), password: password.to_string() })
                .unwrap_err();
            assert_eq!(err.client_message(), "Invalid credentials");
            assert_eq!(err.rpc_code(), "UNAUTHORIZED");
        }
    }

    #[test]
    fn test_cookie_strings() {
        let service = service();
        assert_eq!(
            service.session_cookie("abc", false),
            "app_session_id=abc; Path=/; HttpOnly; SameSite=None; Max-Age=86400"
        );
        assert_eq!(
            service.clear_cookies(true),
            vec![
                "app_session_id=; Path=/; HttpOnly; SameSite=None; Max-Age=0; Secure".to_string(),
                "demo_token=; Path=/; HttpOnly; SameSite=None; Max-Age=0; Secure".to_string(),
            ]
        );
    }
}
