use crate::application::ports::{
    BlockRepository, LikeRepository, MatchStore, MembershipStore, SafetyFilter,
};
use crate::domain::entities::{Conversation, MatchRecord, UnderpopulatedConversation};
use crate::domain::value_objects::{ConversationId, MatchId, UserId, UserPair};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

const BASE_TIMESTAMP_MILLIS: i64 = 1_700_000_000_000;

/// Operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    InsertMembership,
    ClaimConversation,
    ListConversations,
    FilterConversations,
    CreateConversation,
    ListMembers,
    ListUnderpopulated,
    FindMatch,
    UpdateMatchConversation,
    ListBlocked,
    BlockUser,
    UnblockUser,
    RecordLike,
    HasLiked,
    CreateMatch,
}

#[derive(Default)]
struct MemoryState {
    next_conversation: u64,
    next_match: u64,
    clock: i64,
    // Creation order doubles as store order.
    conversations: Vec<Conversation>,
    // Seeded legacy data may hold duplicate pairs.
    memberships: Vec<(ConversationId, UserId)>,
    matches: Vec<MatchRecord>,
    likes: HashSet<(UserId, UserId)>,
    blocks: HashMap<UserId, HashSet<UserId>>,
    // Successes left before the operation starts failing.
    failures: HashMap<StoreOperation, usize>,
}

impl MemoryState {
    fn check(&mut self, operation: StoreOperation) -> Result<(), AppError> {
        match self.failures.get_mut(&operation) {
            Some(0) => Err(AppError::Database(format!(
                "injected failure: {operation:?}"
            ))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        BASE_TIMESTAMP_MILLIS + self.clock
    }

    fn is_member(&self, conversation_id: &ConversationId, user_id: &UserId) -> bool {
        self.memberships
            .iter()
            .any(|(conversation, user)| conversation == conversation_id && user == user_id)
    }

    fn distinct_members(&self, conversation_id: &ConversationId) -> HashSet<&UserId> {
        self.memberships
            .iter()
            .filter(|(id, _)| id == conversation_id)
            .map(|(_, user)| user)
            .collect()
    }

    fn push_conversation(&mut self, owner_id: &UserId) -> ConversationId {
        self.next_conversation += 1;
        let id = ConversationId::new(format!("c{}", self.next_conversation))
            .unwrap_or_else(|_| ConversationId::generate());
        let created_at = self.tick();
        self.conversations
            .push(Conversation::new(id.clone(), owner_id.clone(), created_at));
        id
    }

    fn push_match(&mut self, pair: &UserPair) -> MatchRecord {
        self.next_match += 1;
        let id =
            MatchId::new(format!("m{}", self.next_match)).unwrap_or_else(|_| MatchId::generate());
        let created_at = self.tick();
        let record = MatchRecord::new(id, pair, None, created_at);
        self.matches.push(record.clone());
        record
    }

    fn match_index(&self, match_id: &MatchId) -> Result<usize, AppError> {
        self.matches
            .iter()
            .position(|record| &record.id == match_id)
            .ok_or_else(|| AppError::NotFound(format!("match {match_id}")))
    }
}

/// Row store kept in process memory, implementing every port.
///
/// Ids are sequential (`c1`, `c2`, ... and `m1`, `m2`, ...). Each call yields to the
/// scheduler first so concurrent callers interleave the way they would over a network.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_on(&self, operation: StoreOperation) {
        self.fail_after(operation, 0).await;
    }

    /// Lets `operation` succeed `successes` more times, then fails it on every call.
    pub async fn fail_after(&self, operation: StoreOperation, successes: usize) {
        self.state
            .lock()
            .await
            .failures
            .insert(operation, successes);
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    /// A conversation row with no members, as left behind by an interrupted creation.
    pub async fn seed_conversation(&self, owner: &UserId) -> ConversationId {
        self.state.lock().await.push_conversation(owner)
    }

    /// Appends a membership row without the uniqueness check.
    pub async fn seed_membership(&self, conversation_id: &ConversationId, user_id: &UserId) {
        self.state
            .lock()
            .await
            .memberships
            .push((conversation_id.clone(), user_id.clone()));
    }

    pub async fn seed_match(&self, pair: &UserPair) -> MatchId {
        self.state.lock().await.push_match(pair).id
    }

    pub async fn conversation_count(&self) -> usize {
        self.state.lock().await.conversations.len()
    }

    pub async fn membership_count(&self) -> usize {
        self.state.lock().await.memberships.len()
    }

    pub async fn match_count(&self) -> usize {
        self.state.lock().await.matches.len()
    }

    /// Total rows across conversations, memberships and matches.
    pub async fn row_count(&self) -> usize {
        let state = self.state.lock().await;
        state.conversations.len() + state.memberships.len() + state.matches.len()
    }

    pub async fn members_of(&self, conversation_id: &ConversationId) -> Vec<UserId> {
        self.state
            .lock()
            .await
            .memberships
            .iter()
            .filter(|(conversation, _)| conversation == conversation_id)
            .map(|(_, user)| user.clone())
            .collect()
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn insert_membership(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::InsertMembership)?;

        if !state.conversations.iter().any(|c| &c.id == conversation_id) {
            return Err(AppError::Database(format!(
                "FOREIGN KEY constraint failed: conversation {conversation_id}"
            )));
        }
        if state.is_member(conversation_id, user_id) {
            return Err(AppError::conflict(format!(
                "{user_id} is already a member of {conversation_id}"
            )));
        }
        state
            .memberships
            .push((conversation_id.clone(), user_id.clone()));
        Ok(())
    }

    async fn list_conversation_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ListConversations)?;

        Ok(state
            .conversations
            .iter()
            .filter(|conversation| state.is_member(&conversation.id, user_id))
            .map(|conversation| conversation.id.clone())
            .collect())
    }

    async fn filter_conversation_ids_with_member(
        &self,
        conversation_ids: &[ConversationId],
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::FilterConversations)?;

        Ok(conversation_ids
            .iter()
            .filter(|id| state.is_member(id, user_id))
            .cloned()
            .collect())
    }

    async fn list_solo_conversation_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationId>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ListConversations)?;

        Ok(state
            .conversations
            .iter()
            .filter(|conversation| {
                let members = state.distinct_members(&conversation.id);
                members.len() == 1 && members.contains(user_id)
            })
            .map(|conversation| conversation.id.clone())
            .collect())
    }

    async fn claim_solo_conversation(
        &self,
        conversation_id: &ConversationId,
        owner_id: &UserId,
        other_id: &UserId,
    ) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ClaimConversation)?;

        let (count, has_owner, has_other) = {
            let members = state.distinct_members(conversation_id);
            (
                members.len(),
                members.contains(owner_id),
                members.contains(other_id),
            )
        };
        match (count, has_owner, has_other) {
            (1, true, false) => {
                state
                    .memberships
                    .push((conversation_id.clone(), other_id.clone()));
                Ok(true)
            }
            (2, true, true) => Ok(true),
            _ => Ok(false),
        }
    }

    async fn create_conversation(&self, owner_id: &UserId) -> Result<ConversationId, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::CreateConversation)?;
        Ok(state.push_conversation(owner_id))
    }

    async fn list_member_ids(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<UserId>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ListMembers)?;

        let mut seen = HashSet::new();
        Ok(state
            .memberships
            .iter()
            .filter(|(conversation, user)| conversation == conversation_id && seen.insert(user))
            .map(|(_, user)| user.clone())
            .collect())
    }

    async fn list_underpopulated_conversations(
        &self,
    ) -> Result<Vec<UnderpopulatedConversation>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ListUnderpopulated)?;

        Ok(state
            .conversations
            .iter()
            .filter_map(|conversation| {
                let members = state.distinct_members(&conversation.id);
                (members.len() < 2).then(|| UnderpopulatedConversation {
                    conversation: conversation.clone(),
                    member_count: members.len() as u32,
                })
            })
            .collect())
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn find_match(&self, match_id: &MatchId) -> Result<MatchRecord, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::FindMatch)?;
        let index = state.match_index(match_id)?;
        Ok(state.matches[index].clone())
    }

    async fn update_match_conversation_id(
        &self,
        match_id: &MatchId,
        conversation_id: &ConversationId,
    ) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::UpdateMatchConversation)?;
        let index = state.match_index(match_id)?;
        let record = &mut state.matches[index];
        if record.conversation_id.is_some() {
            return Ok(false);
        }
        record.conversation_id = Some(conversation_id.clone());
        Ok(true)
    }
}

#[async_trait]
impl SafetyFilter for InMemoryStore {
    async fn list_blocked_user_ids(&self, user_id: &UserId) -> Result<HashSet<UserId>, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::ListBlocked)?;
        Ok(state.blocks.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl BlockRepository for InMemoryStore {
    async fn block_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError> {
        if blocker == blocked {
            return Err(AppError::invalid_pair(format!(
                "user {blocker} cannot block itself"
            )));
        }
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::BlockUser)?;
        state
            .blocks
            .entry(blocker.clone())
            .or_default()
            .insert(blocked.clone());
        Ok(())
    }

    async fn unblock_user(&self, blocker: &UserId, blocked: &UserId) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::UnblockUser)?;
        if let Some(set) = state.blocks.get_mut(blocker) {
            set.remove(blocked);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn record_like(&self, from_user: &UserId, to_user: &UserId) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::RecordLike)?;
        state.likes.insert((from_user.clone(), to_user.clone()));
        Ok(())
    }

    async fn has_liked(&self, from_user: &UserId, to_user: &UserId) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::HasLiked)?;
        Ok(state.likes.contains(&(from_user.clone(), to_user.clone())))
    }

    async fn create_match(&self, pair: &UserPair) -> Result<MatchRecord, AppError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.check(StoreOperation::CreateMatch)?;

        let (low, high) = pair.canonical();
        if let Some(existing) = state
            .matches
            .iter()
            .find(|record| &record.user_low == low && &record.user_high == high)
        {
            return Ok(existing.clone());
        }
        Ok(state.push_match(pair))
    }
}
