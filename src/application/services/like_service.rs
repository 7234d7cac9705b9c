use crate::application::ports::{LikeRepository, MatchStore, MembershipStore, SafetyFilter};
use crate::application::services::match_binder::MatchBinder;
use crate::domain::entities::MatchRecord;
use crate::domain::value_objects::{ConversationId, UserPair};
use crate::shared::AppError;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Recorded; the other user has not liked back yet.
    Pending,
    Matched {
        match_record: MatchRecord,
        conversation_id: ConversationId,
    },
}

/// Match acceptance flow: a reciprocated like becomes a match with its own conversation.
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    safety: Arc<dyn SafetyFilter>,
    binder: MatchBinder,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        safety: Arc<dyn SafetyFilter>,
        store: Arc<dyn MembershipStore>,
        matches: Arc<dyn MatchStore>,
    ) -> Self {
        Self {
            likes,
            safety,
            binder: MatchBinder::new(store, matches),
        }
    }

    pub async fn like(&self, from_user: &str, to_user: &str) -> Result<LikeOutcome, AppError> {
        let pair = UserPair::new(from_user, to_user)?;
        let (from, to) = (pair.first(), pair.second());

        let blocked_by_sender = self.safety.list_blocked_user_ids(from).await?;
        let blocked_by_recipient = self.safety.list_blocked_user_ids(to).await?;
        if blocked_by_sender.contains(to) || blocked_by_recipient.contains(from) {
            return Err(AppError::blocked(from.as_str(), to.as_str()));
        }

        self.likes.record_like(from, to).await?;
        if !self.likes.has_liked(to, from).await? {
            debug!(user_id = %from, other_user_id = %to, "Like recorded");
            return Ok(LikeOutcome::Pending);
        }

        let mut match_record = self.likes.create_match(&pair).await?;
        let conversation_id = self.binder.bind_pair(&match_record.id, &pair).await?;
        match_record.conversation_id = Some(conversation_id.clone());

        info!(
            match_id = %match_record.id,
            conversation_id = %conversation_id,
            "Mutual like matched"
        );
        Ok(LikeOutcome::Matched {
            match_record,
            conversation_id,
        })
    }
}
