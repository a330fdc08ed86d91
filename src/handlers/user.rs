//! 用户自助的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    handlers::extract::{ValidatedJson, ValidatedQuery},
    middleware::AppState,
    models::{
        pagination::PaginationParams,
        user::{CurrentUserResponse, UpdateCurrentUserRequest},
    },
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 活跃用户分页列表，无需登录
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.user_service.list_users(params).await?;
    Ok(Json(response))
}

/// 当前用户资料
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<CurrentUserResponse> {
    Json(user.into())
}

/// 更新当前用户资料
pub async fn update_current_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateCurrentUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.user_service.update_current(&user, req).await?;
    Ok(Json(response))
}
