//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::repository::RepoError;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

pub const UNAUTHENTICATED_MESSAGE: &str = "Пользователь не опознан";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Доступ разрешен только администраторам";
pub const USER_NOT_FOUND_MESSAGE: &str = "Пользователь не найден";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";
pub const INTERNAL_ERROR_MESSAGE: &str = "Что-то пошло не так, мы уже исправляем эту ошибку";

/// 受唯一约束保护的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
    CityName,
}

impl UniqueField {
    pub fn message(&self) -> &'static str {
        match self {
            UniqueField::Email => "Почта уже используется",
            UniqueField::Phone => "Телефон уже используется",
            UniqueField::CityName => "Город уже существует",
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("User not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Duplicate value for {0:?}")]
    DuplicateField(UniqueField),

    #[error("Validation error: {0:?}")]
    Validation(Vec<String>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::DuplicateField(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_string(),
            AppError::Forbidden => ADMIN_REQUIRED_MESSAGE.to_string(),
            AppError::NotFound => USER_NOT_FOUND_MESSAGE.to_string(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::DuplicateField(field) => field.message().to_string(),
            AppError::Validation(messages) => messages.join("; "),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }

    /// 响应体：400/500 为 {code, message}，401/403/404 仅 {message}，422 为 {detail: [...]}
    fn body(&self) -> serde_json::Value {
        match self {
            AppError::Unauthenticated | AppError::Forbidden | AppError::NotFound => {
                json!({ "message": self.user_message() })
            }
            AppError::Validation(messages) => {
                let detail: Vec<ValidationDetail> = messages
                    .iter()
                    .map(|message| ValidationDetail {
                        code: self.code(),
                        message: message.clone(),
                    })
                    .collect();
                json!({ "detail": detail })
            }
            _ => serde_json::to_value(ErrorResponse {
                code: self.code(),
                message: self.user_message(),
            })
            .unwrap_or_else(|_| json!({ "message": INTERNAL_ERROR_MESSAGE })),
        }
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), message = %self, "Application error");
        } else {
            tracing::debug!(code = self.code(), message = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::UniquenessViolation { field } => AppError::DuplicateField(field),
            RepoError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, err.code),
                })
            })
            .collect();
        messages.sort();

        AppError::Validation(messages)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
