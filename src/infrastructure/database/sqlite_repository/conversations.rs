use super::mapper::{ConversationRow, parse_conversation_id, parse_user_id};
use super::queries::{
    CLAIM_SOLO_CONVERSATION, INSERT_CONVERSATION, INSERT_MEMBERSHIP, SELECT_CONVERSATION_IDS_BY_USER, SELECT_MEMBER_IDS,
    SELECT_SOLO_CONVERSATION_IDS, SELECT_UNDERPOPULATED_CONVERSATIONS,
};
use super::{SqliteRepository, now_millis};
use crate::application::ports::MembershipStore;
use crate::domain::entities::UnderpopulatedConversation;
use crate::domain::value_objects::{ConversationId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashSet;

// Stays well below SQLite's bound-parameter limit.
const FILTER_CHUNK_SIZE: usize = 500;

#[async_trait]
impl MembershipStore for SqliteRepository {
    async fn insert_membership(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let result = sqlx::query(INSERT_MEMBERSHIP)
            .bind(conversation_id.as_str())
            .bind(user_id.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "{user_id} is already a member of {conversation_id}"
            )));
        }
        Ok(())
    }

    async fn list_conversation_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_CONVERSATION_IDS_BY_USER)
            .bind(user_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(parse_conversation_id).collect()
    }

    async fn filter_conversation_ids_with_member(
        &self,
        conversation_ids: &[ConversationId],
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut matched: HashSet<String> = HashSet::new();
        for chunk in conversation_ids.chunks(FILTER_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT conversation_id FROM conversation_members WHERE user_id = ",
            );
            builder.push_bind(user_id.as_str());
            builder.push(" AND conversation_id IN (");
            for (index, id) in chunk.iter().enumerate() {
                if index > 0 {
                    builder.push(", ");
                }
                builder.push_bind(id.as_str());
            }
            builder.push(")");

            let rows: Vec<String> = builder
                .build_query_scalar::<String>()
                .fetch_all(self.pool.get_pool())
                .await?;
            matched.extend(rows);
        }

        // Input order is already store order.
        Ok(conversation_ids
            .iter()
            .filter(|id| matched.contains(id.as_str()))
            .cloned()
            .collect())
    }

    async fn list_solo_conversation_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_SOLO_CONVERSATION_IDS)
            .bind(user_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(parse_conversation_id).collect()
    }

    async fn claim_solo_conversation(
        &self,
        conversation_id: &ConversationId,
        owner_id: &UserId,
        other_id: &UserId,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(CLAIM_SOLO_CONVERSATION)
            .bind(conversation_id.as_str())
            .bind(owner_id.as_str())
            .bind(other_id.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Lost the write, or the pair already holds it.
        let members: HashSet<UserId> = self
            .list_member_ids(conversation_id)
            .await?
            .into_iter()
            .collect();
        Ok(members.len() == 2 && members.contains(owner_id) && members.contains(other_id))
    }

    async fn create_conversation(&self, owner_id: &UserId) -> Result<ConversationId, AppError> {
        let id = ConversationId::generate();
        sqlx::query(INSERT_CONVERSATION)
            .bind(id.as_str())
            .bind(owner_id.as_str())
            .bind(now_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(id)
    }

    async fn list_member_ids(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<UserId>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_MEMBER_IDS)
            .bind(conversation_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter().map(parse_user_id).collect()
    }

    async fn list_underpopulated_conversations(
        &self,
    ) -> Result<Vec<UnderpopulatedConversation>, AppError> {
        let rows = sqlx::query_as::<_, ConversationRow>(SELECT_UNDERPOPULATED_CONVERSATIONS)
            .fetch_all(self.pool.get_pool())
            .await?;

        rows.into_iter()
            .map(ConversationRow::into_underpopulated)
            .collect()
    }
}
