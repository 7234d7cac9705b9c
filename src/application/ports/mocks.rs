use super::{LikeRepository, MatchStore, MembershipStore, SafetyFilter};
use crate::domain::entities::{MatchRecord, UnderpopulatedConversation};
use crate::domain::value_objects::{ConversationId, MatchId, UserId, UserPair};
use crate::shared::AppError;
use async_trait::async_trait;
use mockall::mock;
use std::collections::HashSet;

mock! {
    pub Store {}

    #[async_trait]
    impl MembershipStore for Store {
        async fn insert_membership(
            &self,
            conversation_id: &ConversationId,
            user_id: &UserId,
        ) -> Result<(), AppError>;
        async fn list_conversation_ids_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<ConversationId>, AppError>;
        async fn filter_conversation_ids_with_member(
            &self,
            conversation_ids: &[ConversationId],
            user_id: &UserId,
        ) -> Result<Vec<ConversationId>, AppError>;
        async fn list_solo_conversation_ids(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<ConversationId>, AppError>;
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
}

mock! {
    pub Safety {}

    #[async_trait]
    impl SafetyFilter for Safety {
        async fn list_blocked_user_ids(&self, user_id: &UserId) -> Result<HashSet<UserId>, AppError>;
    }
}

mock! {
    pub Matches {}

    #[async_trait]
    impl MatchStore for Matches {
        async fn find_match(&self, match_id: &MatchId) -> Result<MatchRecord, AppError>;
        async fn update_match_conversation_id(
            &self,
            match_id: &MatchId,
            conversation_id: &ConversationId,
        ) -> Result<bool, AppError>;
    }
}

mock! {
    pub Likes {}

    #[async_trait]
    impl LikeRepository for Likes {
        async fn record_like(&self, from_user: &UserId, to_user: &UserId) -> Result<(), AppError>;
        async fn has_liked(&self, from_user: &UserId, to_user: &UserId) -> Result<bool, AppError>;
        async fn create_match(&self, pair: &UserPair) -> Result<MatchRecord, AppError>;
    }
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn conversation(id: &str) -> ConversationId {
    ConversationId::new(id).expect("valid conversation id")
}

pub fn match_id(id: &str) -> MatchId {
    MatchId::new(id).expect("valid match id")
}

pub fn match_record(id: &str, a: &str, b: &str, conversation_id: Option<&str>) -> MatchRecord {
    let pair = UserPair::new(a, b).expect("valid pair");
    MatchRecord::new(
        match_id(id),
        &pair,
        conversation_id.map(conversation),
        1_700_000_000_000,
    )
}
