#![allow(dead_code)]

use kindred::application::ports::MembershipStore;
use kindred::shared::ResolverConfig;
use kindred::{
    ConnectionPool, ConversationId, DirectConversationService, InMemoryStore, Repository,
    SqliteRepository, UserId,
};
use std::sync::Arc;
use tempfile::TempDir;

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn conversation(id: &str) -> ConversationId {
    ConversationId::new(id).expect("valid conversation id")
}

pub fn memory_service(store: &Arc<InMemoryStore>) -> DirectConversationService {
    DirectConversationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ResolverConfig::default(),
    )
}

pub struct SqliteContext {
    pub repository: Arc<SqliteRepository>,
    pub pool: ConnectionPool,
    // Dropping the directory removes the database file.
    _dir: TempDir,
}

impl SqliteContext {
    pub fn service(&self) -> DirectConversationService {
        DirectConversationService::new(
            self.repository.clone(),
            self.repository.clone(),
            self.repository.clone(),
            ResolverConfig::default(),
        )
    }
}

pub async fn setup_sqlite() -> SqliteContext {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = ConnectionPool::open_file(&dir.path().join("kindred.db"))
        .await
        .expect("open database");
    let repository = SqliteRepository::new(pool.clone());
    repository.initialize().await.expect("apply migrations");

    SqliteContext {
        repository: Arc::new(repository),
        pool,
        _dir: dir,
    }
}

/// Distinct members, sorted, so assertions do not depend on insertion order.
pub async fn sorted_members(
    store: &dyn MembershipStore,
    conversation_id: &ConversationId,
) -> Vec<String> {
    let mut members: Vec<String> = store
        .list_member_ids(conversation_id)
        .await
        .expect("list members")
        .into_iter()
        .map(String::from)
        .collect();
    members.sort();
    members
}
