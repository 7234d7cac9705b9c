use super::ConnectionPool;
use super::Repository;
use crate::shared::error::AppError;
use async_trait::async_trait;

mod blocks;
mod conversations;
mod likes;
mod mapper;
mod matches;
mod queries;

pub struct SqliteRepository {
    pool: ConnectionPool,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
