pub mod conversation;
pub mod match_record;

pub use conversation::{Conversation, UnderpopulatedConversation};
pub use match_record::MatchRecord;
