//! Postgres 连接池与 user / city 表迁移

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("cannot connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("cannot apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
}

/// 建立连接池，启动时即连接
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = pool_options(config)
        .connect(config.url.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Database connection failed");
            DbError::Connect(e)
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool ready"
    );

    Ok(pool)
}

/// 惰性连接池：首次取连接时才访问数据库
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    pool_options(config)
        .min_connections(0)
        .connect_lazy(config.url.expose_secret())
        .map_err(DbError::Connect)
}

/// 应用 ./migrations 下的 user、city 表结构
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;

    tracing::info!("Schema for user and city is up to date");
    Ok(())
}

/// 数据库连通性探测
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Secret::new(url.to_string()),
            max_connections: 2,
            min_connections: 1,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 60,
            max_lifetime_secs: 60,
        }
    }

    #[tokio::test]
    async fn test_lazy_pool_does_not_connect() {
        let pool = create_lazy_pool(&config("postgresql://nobody@127.0.0.1:1/none")).unwrap();
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    async fn test_lazy_pool_rejects_bad_url() {
        assert!(matches!(
            create_lazy_pool(&config("not a url")),
            Err(DbError::Connect(_))
        ));
    }

    #[tokio::test]
    async fn test_ping_reports_unreachable_database() {
        let pool = create_lazy_pool(&config("postgresql://nobody@127.0.0.1:1/none")).unwrap();
        assert!(ping(&pool).await.is_err());
    }
}
