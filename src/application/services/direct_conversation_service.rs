use crate::application::ports::{MatchStore, MembershipStore, SafetyFilter};
use crate::application::services::conversation_resolver::ConversationResolver;
use crate::application::services::match_binder::MatchBinder;
use crate::domain::value_objects::ConversationId;
use crate::shared::{AppError, ResolverConfig};
use std::sync::Arc;

/// The one entry point every caller (message button, match flow, thread view) shares.
pub struct DirectConversationService {
    resolver: ConversationResolver,
    binder: MatchBinder,
}

impl DirectConversationService {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        safety: Arc<dyn SafetyFilter>,
        matches: Arc<dyn MatchStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            resolver: ConversationResolver::new(Arc::clone(&store), safety, config),
            binder: MatchBinder::new(store, matches),
        }
    }

    /// Fails with `InvalidPair`, `Blocked`, or a store error.
    pub async fn resolve_direct_conversation(
        &self,
        self_id: &str,
        other_id: &str,
    ) -> Result<ConversationId, AppError> {
        self.resolver.resolve(self_id, other_id).await
    }

    pub async fn bind_match_conversation(
        &self,
        match_id: &str,
        user_a: &str,
        user_b: &str,
    ) -> Result<ConversationId, AppError> {
        self.binder.bind(match_id, user_a, user_b).await
    }
}
