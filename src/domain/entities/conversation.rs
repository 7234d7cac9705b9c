use crate::domain::value_objects::{ConversationId, UserId};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: ConversationId, created_by: UserId, created_at_millis: i64) -> Self {
        let created_at = Utc
            .timestamp_millis_opt(created_at_millis)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            id,
            created_by,
            created_at,
        }
    }

    pub fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// A conversation that currently has fewer than two member rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderpopulatedConversation {
    pub conversation: Conversation,
    pub member_count: u32,
}
