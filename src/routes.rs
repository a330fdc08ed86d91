//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{handlers, middleware::AppState};

/// 请求体上限（1 MiB）
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
///
/// 认证与鉴权由处理器参数中的 `CurrentUser` / `AdminUser` 提取器完成。
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout));

    // 普通用户
    let user_routes = Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/", get(handlers::user::list_users))
        .route(
            "/users/current",
            get(handlers::user::get_current_user).patch(handlers::user::update_current_user),
        );

    // 管理员
    let private_routes = Router::new()
        .route(
            "/private/users",
            get(handlers::private::list_users).post(handlers::private::create_user),
        )
        .route(
            "/private/users/{id}",
            get(handlers::private::get_user)
                .patch(handlers::private::update_user)
                .delete(handlers::private::delete_user),
        );

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(private_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
