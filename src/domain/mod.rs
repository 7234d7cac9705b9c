pub mod entities;
pub mod value_objects;

pub use entities::{Conversation, MatchRecord, UnderpopulatedConversation};
pub use value_objects::{ConversationId, MatchId, UserId, UserPair};
