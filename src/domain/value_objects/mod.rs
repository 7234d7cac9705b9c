pub mod conversation_id;
pub mod match_id;
pub mod user_id;
pub mod user_pair;

pub use conversation_id::ConversationId;
pub use match_id::MatchId;
pub use user_id::UserId;
pub use user_pair::UserPair;
