//! 管理员用户管理的 HTTP 处理器（/private/users）

use crate::{
    auth::middleware::AdminUser,
    error::AppError,
    handlers::extract::{ValidatedJson, ValidatedPath, ValidatedQuery},
    middleware::AppState,
    models::{
        pagination::PaginationParams,
        user::{AdminUpdateUserRequest, CreateUserRequest},
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GetUserParams {
    /// 是否允许返回已软删除的用户
    #[serde(default)]
    pub include_inactive: bool,
}

/// 用户列表（附城市提示）
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.user_service.admin_list(params).await?;
    Ok(Json(response))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(admin_id = admin.id, "Admin creating user");

    let user = state.user_service.admin_create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedQuery(params): ValidatedQuery<GetUserParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_service
        .admin_get(id, params.include_inactive)
        .await?;
    Ok(Json(user))
}

/// 部分更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(req): ValidatedJson<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.admin_update(id, req).await?;
    Ok(Json(user))
}

/// 软删除用户：成功 204，未命中 404
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<StatusCode, AppError> {
    if state.user_service.admin_delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
