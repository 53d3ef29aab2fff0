//! SQLite persistence: page store, vector index, and profile storage share
//! one pool.

pub mod connection;
pub mod migrations;
pub mod page_repository;
pub mod profile_repository;
pub mod vector_index;

pub use connection::{create_pool, create_test_pool, PoolConfig};
pub use migrations::Migrator;
pub use page_repository::SqlitePageRepository;
pub use profile_repository::SqliteProfileRepository;
pub use vector_index::SqliteVectorIndex;
