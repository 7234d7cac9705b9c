use crate::domain::entities::MatchRecord;
use crate::domain::value_objects::{ConversationId, MatchId};
use crate::shared::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Stored match, including its users and conversation back-reference.
    /// Unknown matches yield `AppError::NotFound`.
    async fn find_match(&self, match_id: &MatchId) -> Result<MatchRecord, AppError>;

    /// Sets the back-reference only while it is empty. Returns whether this call wrote it.
    async fn update_match_conversation_id(
        &self,
        match_id: &MatchId,
        conversation_id: &ConversationId,
    ) -> Result<bool, AppError>;
}
