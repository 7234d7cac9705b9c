use super::mapper::MatchRow;
use super::queries::{
    INSERT_LIKE, INSERT_MATCH, SELECT_LIKE_EXISTS, SELECT_MATCH_BY_PAIR,
};
use super::{SqliteRepository, now_millis};
use crate::application::ports::LikeRepository;
use crate::domain::entities::MatchRecord;
use crate::domain::value_objects::{MatchId, UserId, UserPair};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
impl LikeRepository for SqliteRepository {
    async fn record_like(&self, from_user: &UserId, to_user: &UserId) -> Result<(), AppError> {
        sqlx::query(INSERT_LIKE)
            .bind(from_user.as_str())
            .bind(to_user.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn has_liked(&self, from_user: &UserId, to_user: &UserId) -> Result<bool, AppError> {
        let exists: i64 = sqlx::query_scalar(SELECT_LIKE_EXISTS)
            .bind(from_user.as_str())
            .bind(to_user.as_str())
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(exists != 0)
    }

    async fn create_match(&self, pair: &UserPair) -> Result<MatchRecord, AppError> {
        let (low, high) = pair.canonical();
        sqlx::query(INSERT_MATCH)
            .bind(MatchId::generate().as_str())
            .bind(low.as_str())
            .bind(high.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;

        let row = sqlx::query_as::<_, MatchRow>(SELECT_MATCH_BY_PAIR)
            .bind(low.as_str())
            .bind(high.as_str())
            .fetch_one(self.pool.get_pool())
            .await?;
        MatchRecord::try_from(row)
    }
}
