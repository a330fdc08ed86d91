//! 城市字典服务（只增不改）

use crate::{
    error::{AppError, Result},
    models::city::City,
    repository::CityRepository,
};
use sqlx::PgPool;

pub struct CityService {
    db: PgPool,
}

impl CityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_city(&self, name: &str) -> Result<City> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name: must not be empty"));
        }

        let mut tx = self.db.begin().await?;
        let city = CityRepository::new(&mut tx).create(name).await?;
        tx.commit().await?;

        tracing::info!(city_id = city.id, name = %city.name, "City created");

        Ok(city)
    }

    pub async fn list_cities(&self) -> Result<Vec<City>> {
        let mut tx = self.db.begin().await?;
        let cities = CityRepository::new(&mut tx).list().await?;
        tx.commit().await?;

        Ok(cities)
    }
}
