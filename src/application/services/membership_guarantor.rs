use crate::application::ports::MembershipStore;
use crate::domain::value_objects::{ConversationId, UserId};
use crate::shared::AppError;
use std::sync::Arc;
use tracing::debug;

/// Makes a user a member of a conversation, any number of times, with one observable effect.
#[derive(Clone)]
pub struct MembershipGuarantor {
    store: Arc<dyn MembershipStore>,
}

impl MembershipGuarantor {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    pub async fn ensure_member(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        match self.store.insert_membership(conversation_id, user_id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_conflict() => {
                debug!(
                    conversation_id = %conversation_id,
                    user_id = %user_id,
                    "Membership already present"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// `first` is written before `second`, so an interrupted call leaves a conversation the
    /// caller can still find and repair.
    pub async fn ensure_members(
        &self,
        conversation_id: &ConversationId,
        first: &UserId,
        second: &UserId,
    ) -> Result<(), AppError> {
        self.ensure_member(conversation_id, first).await?;
        self.ensure_member(conversation_id, second).await
    }
}
