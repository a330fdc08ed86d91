//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::{expired_session_cookie, session_cookie, CurrentUser},
    error::AppError,
    handlers::extract::ValidatedJson,
    middleware::AppState,
    models::{auth::LoginRequest, user::CurrentUserResponse},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 登录：校验凭据，下发 HttpOnly 的 Authorization Cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.auth_service.login(&req).await?;

    let security = &state.config.security;
    let cookie = session_cookie(&token, security.cookie_max_age_secs(), security.cookie_secure);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(CurrentUserResponse::from(user)),
    ))
}

/// 登出：仅清除 Cookie，令牌在自然过期前仍然有效
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    tracing::info!(user_id = user.id, "User logged out");

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            expired_session_cookie(state.config.security.cookie_secure),
        )],
    )
}
