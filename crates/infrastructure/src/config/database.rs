//! Database (SQLite) configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite:moderation.db" or "sqlite::memory:")
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections to keep open
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Enable WAL mode for concurrent readers
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

fn default_url() -> String {
    "sqlite:moderation.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_min_connections() -> u32 {
    1
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            wal_mode: true,
        }
    }
}

impl DatabaseConfig {
    /// In-memory database for tests and ephemeral runs
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            // Each connection would get its own in-memory database
            max_connections: 1,
            min_connections: 1,
            wal_mode: false,
        }
    }

    /// File-based database with default pool settings
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            url: format!("sqlite:{}", path.as_ref().display()),
            ..Self::default()
        }
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}
