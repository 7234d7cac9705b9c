use super::mapper::parse_user_id;
use super::queries::{DELETE_BLOCK, INSERT_BLOCK, SELECT_BLOCKED_IDS};
use super::{SqliteRepository, now_millis};
use crate::application::ports::{BlockRepository, SafetyFilter};
use crate::domain::value_objects::UserId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
impl SafetyFilter for SqliteRepository {
    async fn list_blocked_user_ids(&self, user_id: &UserId) -> Result<HashSet<UserId>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_BLOCKED_IDS)
            .bind(user_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(parse_user_id).collect()
    }
}

#[async_trait]
impl BlockRepository for SqliteRepository {
    async fn block_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError> {
        if blocker == blocked {
            return Err(AppError::invalid_pair(format!(
                "user {blocker} cannot block itself"
            )));
        }
        sqlx::query(INSERT_BLOCK)
            .bind(blocker.as_str())
            .bind(blocked.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn unblock_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError> {
        sqlx::query(DELETE_BLOCK)
            .bind(blocker.as_str())
            .bind(blocked.as_str())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }
}
