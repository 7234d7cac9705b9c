use crate::domain::entities::UnderpopulatedConversation;
use crate::domain::value_objects::{ConversationId, UserId};
use crate::shared::AppError;
use async_trait::async_trait;

/// The slice of the backend the conversation protocol relies on.
///
/// Orderings are store-assigned and stable: oldest conversation first, ties broken by id.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Inserts the (conversation, user) pair.
    ///
    /// Returns `AppError::Conflict` when the pair already exists.
    async fn insert_membership(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<(), AppError>;

    async fn list_conversation_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError>;

    /// Subset of `conversation_ids` that `user_id` belongs to, in store order.
    async fn filter_conversation_ids_with_member(
        &self,
        conversation_ids: &[ConversationId],
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError>;

    /// Conversations whose only member is `user_id`, in store order.
    async fn list_solo_conversation_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError>;

    /// Adds `other_id` to a conversation whose only member is `owner_id`, as one guarded
    /// write. Returns `true` when the members are exactly `{owner_id, other_id}` afterwards,
    /// and `false` when the conversation belongs to someone else by now.
    async fn claim_solo_conversation(
        &self,
        conversation_id: &ConversationId,
        owner_id: &UserId,
        other_id: &UserId,
    ) -> Result<bool, AppError>;

    async fn create_conversation(&self, owner_id: &UserId) -> Result<ConversationId, AppError>;

    async fn list_member_ids(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<UserId>, AppError>;

    async fn list_underpopulated_conversations(
        &self,
    ) -> Result<Vec<UnderpopulatedConversation>, AppError>;
}
