//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the moderation record
//! stores, configuration loading, tier table files and logging setup.

pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod tier_table_loader;

pub use config::{
    AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, ModerationSettings,
};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseError, InMemoryModerationRecordStore, SqliteModerationRecordStore,
};
pub use telemetry::{TelemetryError, init_logging};
pub use tier_table_loader::{load_classifier, load_tier_table};
