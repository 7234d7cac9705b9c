use crate::application::ports::{MatchStore, MembershipStore};
use crate::application::services::membership_guarantor::MembershipGuarantor;
use crate::domain::value_objects::{ConversationId, MatchId, UserPair};
use crate::shared::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attaches a fresh conversation to a match, at most once.
///
/// A match never reuses an ad-hoc conversation. Failures after the conversation row is
/// created leave it in place; resolving the pair later repairs its membership.
pub struct MatchBinder {
    store: Arc<dyn MembershipStore>,
    matches: Arc<dyn MatchStore>,
    guarantor: MembershipGuarantor,
}

impl MatchBinder {
    pub fn new(store: Arc<dyn MembershipStore>, matches: Arc<dyn MatchStore>) -> Self {
        let guarantor = MembershipGuarantor::new(Arc::clone(&store));
        Self {
            store,
            matches,
            guarantor,
        }
    }

    pub async fn bind(
        &self,
        match_id: &str,
        user_a: &str,
        user_b: &str,
    ) -> Result<ConversationId, AppError> {
        let match_id = MatchId::new(match_id).map_err(AppError::NotFound)?;
        let pair = UserPair::new(user_a, user_b)?;
        self.bind_pair(&match_id, &pair).await
    }

    /// Refuses with `InvalidPair` when `pair` is not the match's own two users, before any
    /// write.
    pub async fn bind_pair(
        &self,
        match_id: &MatchId,
        pair: &UserPair,
    ) -> Result<ConversationId, AppError> {
        let record = self.matches.find_match(match_id).await?;
        if !record.is_between(pair) {
            warn!(
                match_id = %match_id,
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                "Refusing to bind match for users outside it"
            );
            return Err(AppError::invalid_pair(format!(
                "match {match_id} is not between {} and {}",
                pair.first(),
                pair.second()
            )));
        }

        if let Some(existing) = record.conversation_id {
            debug!(
                match_id = %match_id,
                conversation_id = %existing,
                "Match already bound"
            );
            self.guarantor
                .ensure_members(&existing, pair.first(), pair.second())
                .await?;
            return Ok(existing);
        }

        let created = self.store.create_conversation(pair.first()).await?;
        self.guarantor
            .ensure_members(&created, pair.first(), pair.second())
            .await?;

        if self
            .matches
            .update_match_conversation_id(match_id, &created)
            .await?
        {
            info!(
                match_id = %match_id,
                conversation_id = %created,
                "Bound conversation to match"
            );
            return Ok(created);
        }

        // Another caller attached first; theirs is authoritative.
        let winner = self
            .matches
            .find_match(match_id)
            .await?
            .conversation_id
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "match {match_id} lost its conversation reference during binding"
                ))
            })?;
        warn!(
            match_id = %match_id,
            orphaned_conversation_id = %created,
            conversation_id = %winner,
            "Concurrent match binding; leaving extra conversation unbound"
        );
        Ok(winner)
    }
}
