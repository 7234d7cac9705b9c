use crate::application::ports::{MembershipStore, SafetyFilter};
use crate::application::services::membership_guarantor::MembershipGuarantor;
use crate::domain::value_objects::{ConversationId, UserPair};
use crate::shared::{AppError, ResolverConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

// A fresh conversation can be claimed by a concurrent first contact with someone else
// between its owner row and the partner row.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Find-or-create for the single 1:1 conversation shared by two users.
///
/// There is no cross-call locking. Two first-contact calls racing for the same pair can
/// both create a conversation; later calls converge on the oldest one because lookups
/// follow store order. Membership repair is safe to repeat because
/// [`MembershipGuarantor::ensure_member`] is idempotent.
///
/// A conversation holding only the caller never gains a partner through a plain insert.
/// It goes through [`MembershipStore::claim_solo_conversation`], so racing first contacts
/// with different users cannot both end up in it.
pub struct ConversationResolver {
    store: Arc<dyn MembershipStore>,
    safety: Arc<dyn SafetyFilter>,
    guarantor: MembershipGuarantor,
    config: ResolverConfig,
}

impl ConversationResolver {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        safety: Arc<dyn SafetyFilter>,
        config: ResolverConfig,
    ) -> Self {
        let guarantor = MembershipGuarantor::new(Arc::clone(&store));
        Self {
            store,
            safety,
            guarantor,
            config,
        }
    }

    pub async fn resolve(
        &self,
        self_id: &str,
        other_id: &str,
    ) -> Result<ConversationId, AppError> {
        let pair = UserPair::new(self_id, other_id)?;
        self.resolve_pair(&pair).await
    }

    /// `pair.first()` is the caller and becomes the owner of a newly created conversation.
    pub async fn resolve_pair(&self, pair: &UserPair) -> Result<ConversationId, AppError> {
        self.ensure_not_blocked(pair).await?;

        if let Some(existing) = self.find_shared(pair).await? {
            debug!(
                conversation_id = %existing,
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                "Reusing direct conversation"
            );
            self.guarantor
                .ensure_members(&existing, pair.first(), pair.second())
                .await?;
            return Ok(existing);
        }

        if let Some(adopted) = self.adopt_solo(pair).await? {
            return Ok(adopted);
        }

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let created = self.store.create_conversation(pair.first()).await?;
            info!(
                conversation_id = %created,
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                "Created direct conversation"
            );
            // Owner first, so an interrupted call leaves a conversation the caller can adopt.
            self.guarantor.ensure_member(&created, pair.first()).await?;
            if self
                .store
                .claim_solo_conversation(&created, pair.first(), pair.second())
                .await?
            {
                return Ok(created);
            }
            warn!(
                conversation_id = %created,
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                attempt,
                "New conversation was claimed by another contact"
            );
        }

        Err(AppError::conflict(format!(
            "could not settle a conversation between {} and {}",
            pair.first(),
            pair.second()
        )))
    }

    /// Lookup phase. Performs no writes.
    ///
    /// Returns the oldest conversation both users belong to.
    pub async fn find_shared(&self, pair: &UserPair) -> Result<Option<ConversationId>, AppError> {
        let own = self
            .store
            .list_conversation_ids_for_user(pair.first())
            .await?;
        if own.is_empty() {
            return Ok(None);
        }

        let shared = self
            .store
            .filter_conversation_ids_with_member(&own, pair.second())
            .await?;
        if shared.len() > 1 {
            warn!(
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                count = shared.len(),
                "Duplicate direct conversations for pair; using the oldest"
            );
        }
        Ok(shared.into_iter().next())
    }

    /// Takes over the oldest conversation in which the caller is the only member, which is
    /// what an interrupted creation leaves behind.
    async fn adopt_solo(&self, pair: &UserPair) -> Result<Option<ConversationId>, AppError> {
        let solo = self
            .store
            .list_solo_conversation_ids(pair.first())
            .await?;
        for orphan in solo {
            if self
                .store
                .claim_solo_conversation(&orphan, pair.first(), pair.second())
                .await?
            {
                warn!(
                    conversation_id = %orphan,
                    user_id = %pair.first(),
                    other_user_id = %pair.second(),
                    "Adopted single-member conversation"
                );
                return Ok(Some(orphan));
            }
            debug!(
                conversation_id = %orphan,
                user_id = %pair.first(),
                "Single-member conversation was taken by another contact"
            );
        }
        Ok(None)
    }

    async fn ensure_not_blocked(&self, pair: &UserPair) -> Result<(), AppError> {
        let blocked = self.safety.list_blocked_user_ids(pair.first()).await?;
        if blocked.contains(pair.second()) {
            debug!(
                user_id = %pair.first(),
                other_user_id = %pair.second(),
                "Refusing to connect blocked user"
            );
            return Err(AppError::blocked(pair.first().as_str(), pair.second().as_str()));
        }

        if self.config.check_reverse_blocks {
            let reverse = self.safety.list_blocked_user_ids(pair.second()).await?;
            if reverse.contains(pair.first()) {
                debug!(
                    user_id = %pair.first(),
                    other_user_id = %pair.second(),
                    "Refusing to connect user blocked by the other side"
                );
                return Err(AppError::blocked(pair.first().as_str(), pair.second().as_str()));
            }
        }

        Ok(())
    }
}
