pub mod like_repository;
pub mod match_store;
pub mod membership_store;
pub mod safety_filter;

pub use like_repository::LikeRepository;
pub use match_store::MatchStore;
pub use membership_store::MembershipStore;
pub use safety_filter::{BlockRepository, SafetyFilter};

#[cfg(test)]
pub(crate) mod mocks;
