//! 认证服务：凭据校验、登录、根据令牌解析当前用户

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::{AppError, Result},
    models::{auth::LoginRequest, user::User},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        Self {
            db,
            jwt_service,
            hasher,
        }
    }

    /// 校验邮箱与密码；用户不存在与密码错误都返回 None
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_active_by_email(login).await?;

        let Some(user) = user else {
            tracing::debug!("Login attempt for unknown email");
            return Ok(None);
        };

        let verified = self
            .hasher
            .verify_blocking(password.to_string(), user.hashed_password.clone())
            .await?;

        if verified {
            Ok(Some(user))
        } else {
            tracing::debug!(user_id = user.id, "Login attempt with wrong password");
            Ok(None)
        }
    }

    /// 用户登录，返回用户与访问令牌
    pub async fn login(&self, req: &LoginRequest) -> Result<(User, String)> {
        let user = self
            .authenticate(&req.login, &req.password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.jwt_service.issue_access_token(&user.email)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok((user, token))
    }

    /// 根据令牌解析当前用户
    pub async fn resolve_current_user(&self, token: Option<&str>) -> Result<User> {
        let token = token.ok_or(AppError::Unauthenticated)?;
        let claims = self.jwt_service.verify(token)?;

        self.find_active_by_email(&claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut tx = self.db.begin().await?;
        let user = UserRepository::new(&mut tx)
            .get_by_email(email, false)
            .await?;
        tx.commit().await?;

        Ok(user)
    }
}
