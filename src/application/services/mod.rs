pub mod conversation_resolver;
pub mod direct_conversation_service;
pub mod like_service;
pub mod match_binder;
pub mod membership_guarantor;

pub use conversation_resolver::ConversationResolver;
pub use direct_conversation_service::DirectConversationService;
pub use like_service::{LikeOutcome, LikeService};
pub use match_binder::MatchBinder;
pub use membership_guarantor::MembershipGuarantor;
