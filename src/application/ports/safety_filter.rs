use crate::domain::value_objects::UserId;
use crate::shared::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait SafetyFilter: Send + Sync {
    /// Ids `user_id` has blocked. Empty when there is no block data.
    async fn list_blocked_user_ids(&self, user_id: &UserId) -> Result<HashSet<UserId>, AppError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn block_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError>;
    async fn unblock_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError>;
}
