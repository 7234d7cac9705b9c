use crate::domain::value_objects::{ConversationId, MatchId, UserId, UserPair};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Mutual-like pairing. Users are stored in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub user_low: UserId,
    pub user_high: UserId,
    pub conversation_id: Option<ConversationId>,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        id: MatchId,
        pair: &UserPair,
        conversation_id: Option<ConversationId>,
        created_at_millis: i64,
    ) -> Self {
        let (low, high) = pair.canonical();
        let created_at = Utc
            .timestamp_millis_opt(created_at_millis)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            id,
            user_low: low.clone(),
            user_high: high.clone(),
            conversation_id,
            created_at,
        }
    }

    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.user_low == user_id || &self.user_high == user_id
    }

    /// Whether the match joins exactly these two users, in either order.
    pub fn is_between(&self, pair: &UserPair) -> bool {
        let (low, high) = pair.canonical();
        &self.user_low == low && &self.user_high == high
    }
}
