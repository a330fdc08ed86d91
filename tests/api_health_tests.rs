//! 健康检查 API 集成测试

use axum::http::StatusCode;
use serial_test::serial;

mod common;
use common::{
    body_json, create_test_config, empty_request, send, setup_app, setup_lazy_app,
    unreachable_db_config,
};

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_lazy_app(create_test_config());

    let response = send(&app, empty_request("GET", "/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["uptime_secs"].is_number());
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let app = setup_lazy_app(create_test_config());

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-trace-id", "trace-abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.headers()["x-trace-id"], "trace-abc");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = setup_lazy_app(unreachable_db_config());

    let response = send(&app, empty_request("GET", "/ready", None)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["ready"], false);
    assert_eq!(json["checks"][0]["name"], "database");
    assert_eq!(json["checks"][0]["status"], "unhealthy");
    assert!(json["checks"][0]["message"].is_string());
}

#[tokio::test]
async fn test_session_is_checked_before_path_parsing() {
    let app = setup_lazy_app(create_test_config());

    // 无 Cookie 时不触达数据库，直接 401
    let response = send(&app, empty_request("GET", "/private/users/abc", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, empty_request("GET", "/users/current", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_readiness_endpoint() {
    let (app, _pool) = setup_app().await;

    let response = send(&app, empty_request("GET", "/ready", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"][0]["name"], "database");
    assert_eq!(json["checks"][0]["status"], "healthy");
}
