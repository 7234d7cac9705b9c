use crate::domain::entities::{Conversation, MatchRecord, UnderpopulatedConversation};
use crate::domain::value_objects::{ConversationId, MatchId, UserId, UserPair};
use crate::shared::error::AppError;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub(super) fn parse_conversation_id(raw: String) -> Result<ConversationId, AppError> {
    ConversationId::new(raw).map_err(AppError::Database)
}

pub(super) fn parse_user_id(raw: String) -> Result<UserId, AppError> {
    UserId::new(raw).map_err(AppError::Database)
}

#[derive(Debug, Clone)]
pub(super) struct ConversationRow {
    pub id: String,
    pub created_by: String,
    pub created_at: i64,
    pub member_count: i64,
}

impl<'r> FromRow<'r, SqliteRow> for ConversationRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            member_count: row.try_get("member_count")?,
        })
    }
}

impl ConversationRow {
    pub fn into_underpopulated(self) -> Result<UnderpopulatedConversation, AppError> {
        Ok(UnderpopulatedConversation {
            conversation: Conversation::new(
                parse_conversation_id(self.id)?,
                parse_user_id(self.created_by)?,
                self.created_at,
            ),
            member_count: u32::try_from(self.member_count.max(0)).unwrap_or(u32::MAX),
        })
    }
}

#[derive(Debug, Clone)]
pub(super) struct MatchRow {
    pub id: String,
    pub user_low: String,
    pub user_high: String,
    pub conversation_id: Option<String>,
    pub created_at: i64,
}

impl<'r> FromRow<'r, SqliteRow> for MatchRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_low: row.try_get("user_low")?,
            user_high: row.try_get("user_high")?,
            conversation_id: row.try_get("conversation_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = AppError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let pair = UserPair::new(&row.user_low, &row.user_high)
            .map_err(|err| AppError::Database(format!("corrupt match {}: {err}", row.id)))?;
        let conversation_id = row.conversation_id.map(parse_conversation_id).transpose()?;
        Ok(MatchRecord::new(
            MatchId::new(row.id).map_err(AppError::Database)?,
            &pair,
            conversation_id,
            row.created_at,
        ))
    }
}
