use super::SqliteRepository;
use super::mapper::MatchRow;
use super::queries::{ATTACH_MATCH_CONVERSATION, SELECT_MATCH_BY_ID};
use crate::application::ports::MatchStore;
use crate::domain::entities::MatchRecord;
use crate::domain::value_objects::{ConversationId, MatchId};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
impl MatchStore for SqliteRepository {
    async fn find_match(&self, match_id: &MatchId) -> Result<MatchRecord, AppError> {
        let row = sqlx::query_as::<_, MatchRow>(SELECT_MATCH_BY_ID)
            .bind(match_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => MatchRecord::try_from(row),
            None => Err(AppError::NotFound(format!("match {match_id}"))),
        }
    }

    async fn update_match_conversation_id(
        &self,
        match_id: &MatchId,
        conversation_id: &ConversationId,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(ATTACH_MATCH_CONVERSATION)
            .bind(match_id.as_str())
            .bind(conversation_id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Distinguish "already bound" from "no such match".
        self.find_match(match_id).await?;
        Ok(false)
    }
}
