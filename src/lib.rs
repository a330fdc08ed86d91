//! 用户与城市管理服务
//! Cookie 会话认证、用户自助资料、管理员用户管理（软删除）

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
