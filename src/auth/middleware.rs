//! Cookie 认证提取器与管理员校验

use crate::{error::AppError, middleware::AppState, models::user::User};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

/// Cookie 名称，值格式为 `Bearer <token>`
pub const AUTH_COOKIE: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// 已认证的当前用户
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 已认证且具备管理员权限的用户
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers);
        let user = state
            .auth_service
            .resolve_current_user(token.as_deref())
            .await?;

        Ok(CurrentUser(user))
    }
}

// 先认证再鉴权：未认证始终 401，非管理员始终 403
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_admin(user).map(AdminUser)
    }
}

/// 管理员校验
pub fn require_admin(user: User) -> Result<User, AppError> {
    if user.is_admin {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.id, "Admin access denied");
        Err(AppError::Forbidden)
    }
}

/// 提取令牌：优先读取 Authorization Cookie，其次读取 Authorization 请求头
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    token_from_cookie(headers).or_else(|| token_from_header(headers))
}

fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .and_then(|(_, value)| strip_bearer(value.trim().trim_matches('"')))
}

fn token_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| strip_bearer(s.trim()))
}

fn strip_bearer(value: &str) -> Option<String> {
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// 登录成功后下发的 Set-Cookie 值
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}{}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        AUTH_COOKIE, BEARER_PREFIX, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// 登出时清除 Cookie
pub fn expired_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; SameSite=Lax",
        AUTH_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
        User {
            id: 1,
            first_name: "user".to_string(),
            last_name: "user".to_string(),
            other_name: None,
            email: "user@user.ru".to_string(),
            phone: None,
            birthday: None,
            city: None,
            additional_info: None,
            is_admin,
            is_active: true,
            hashed_password: String::new(),
        }
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; Authorization=Bearer abc.def.ghi".parse().unwrap(),
        );

        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_from_quoted_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "Authorization=\"Bearer abc.def.ghi\"".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_from_header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_missing_or_invalid() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "Authorization=abc".parse().unwrap());
        assert!(extract_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "Authorization=Bearer ".parse().unwrap());
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(user(true)).is_ok());
        assert!(matches!(require_admin(user(false)), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie("abc", 1800, false);
        assert!(cookie.starts_with("Authorization=Bearer abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("abc", 1800, true).ends_with("; Secure"));
        assert!(expired_session_cookie(false).contains("Max-Age=0"));
    }
}
