//! City repository

use super::{map_unique_violation, RepoError};
use crate::models::city::City;
use sqlx::PgConnection;

pub struct CityRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> CityRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, name: &str) -> Result<City, RepoError> {
        sqlx::query_as::<_, City>("INSERT INTO city (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(map_unique_violation)
    }

    /// 全部城市，按 id 升序
    pub async fn list(&mut self) -> Result<Vec<City>, RepoError> {
        let cities = sqlx::query_as::<_, City>("SELECT id, name FROM city ORDER BY id ASC")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(cities)
    }
}
