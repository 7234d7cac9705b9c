use crate::domain::entities::MatchRecord;
use crate::domain::value_objects::{UserId, UserPair};
use crate::shared::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Idempotent: liking twice keeps a single row.
    async fn record_like(&self, from_user: &UserId, to_user: &UserId) -> Result<(), AppError>;

    async fn has_liked(&self, from_user: &UserId, to_user: &UserId) -> Result<bool, AppError>;

    /// Returns the existing match for the canonical pair when there is one.
    async fn create_match(&self, pair: &UserPair) -> Result<MatchRecord, AppError>;
}
