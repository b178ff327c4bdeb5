//! Persistence module
//!
//! Moderation record stores: SQLite for durable deployments, in-memory for
//! tests and ephemeral runs.

pub mod async_connection;
pub mod error;
pub mod in_memory_record_store;
pub mod sqlite_record_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseError};
pub use error::map_sqlx_error;
pub use in_memory_record_store::InMemoryModerationRecordStore;
pub use sqlite_record_store::SqliteModerationRecordStore;
