//! Direct-conversation resolution for Kindred.
//!
//! Given two users, [`DirectConversationService`] finds or creates the one 1:1 conversation
//! they share and guarantees both are members of it. Storage is reached only through the
//! ports in [`application::ports`], with SQLite and in-memory adapters in [`infrastructure`].

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::{
    ConversationResolver, DirectConversationService, LikeOutcome, LikeService, MatchBinder,
    MembershipGuarantor,
};
pub use domain::{ConversationId, MatchId, MatchRecord, UserId, UserPair};
pub use infrastructure::{ConnectionPool, InMemoryStore, Repository, SqliteRepository, StoreOperation};
pub use shared::{AppConfig, AppError, Result, init_logging};
