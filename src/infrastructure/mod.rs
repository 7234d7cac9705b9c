pub mod database;
pub mod memory;

pub use database::{ConnectionPool, Repository, SqliteRepository};
pub use memory::{InMemoryStore, StoreOperation};
