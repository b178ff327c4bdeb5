//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite pool settings
//! - `logging`: log filter and output format
//!
//! Sources are layered: defaults, then an optional `config.toml`, then
//! environment variables such as `MODERATION_DATABASE__URL`.

mod database;
mod logging;

use std::{fmt, path::{Path, PathBuf}};

use application::{AgePolicy, ModerationPolicy};
use domain::{ContentType, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MODERATION";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls validation strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - relaxed warnings
    #[default]
    Development,
    /// Production environment - strict validation
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment '{s}'. Expected 'development' or 'production'"
            )),
        }
    }
}

const fn default_pii_severity() -> Severity {
    Severity::Moderate
}

/// Moderation pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationSettings {
    /// Custom tier table (.json or .toml); the built-in table is used when unset
    #[serde(default)]
    pub tier_table_path: Option<PathBuf>,

    /// Severity contributed by detected personal information
    #[serde(default = "default_pii_severity")]
    pub pii_severity: Severity,

    /// Write an audit record for every evaluation
    #[serde(default)]
    pub audit_all: bool,

    /// Content types that always get an audit record
    #[serde(default)]
    pub audit_content_types: Vec<ContentType>,

    /// Age thresholds
    #[serde(default)]
    pub age: AgePolicy,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            tier_table_path: None,
            pii_severity: default_pii_severity(),
            audit_all: false,
            audit_content_types: Vec::new(),
            age: AgePolicy::default(),
        }
    }
}

impl ModerationSettings {
    /// Pipeline policy derived from these settings
    pub fn policy(&self) -> ModerationPolicy {
        ModerationPolicy {
            pii_severity: self.pii_severity,
            audit_all: self.audit_all,
            audit_content_types: self.audit_content_types.clone(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Moderation pipeline settings
    #[serde(default)]
    pub moderation: ModerationSettings,

    /// Record store database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, falling back to `config.toml`
    ///
    /// An explicit file must exist; the default one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            // e.g. MODERATION_MODERATION__AUDIT_ALL=true
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("moderation.audit_content_types"),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(environment = %loaded.environment, "Configuration loaded");
        Ok(loaded)
    }

    /// Check the configuration
    ///
    /// Returns non-fatal warnings, or the first fatal problem.
    pub fn validate(&self) -> Result<Vec<String>, config::ConfigError> {
        self.moderation
            .age
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        if self.database.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(config::ConfigError::Message(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if let Some(path) = self
            .moderation
            .tier_table_path
            .as_ref()
            .filter(|p| !p.exists())
        {
            return Err(config::ConfigError::Message(format!(
                "tier table not found: {}",
                path.display()
            )));
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            config::ConfigError::Message(format!("invalid logging.filter: {e}"))
        })?;

        let mut warnings = Vec::new();
        if self.moderation.pii_severity < Severity::Moderate {
            warnings.push(format!(
                "moderation.pii_severity is {}; personal information will not be masked",
                self.moderation.pii_severity
            ));
        }
        if self.environment == Environment::Production {
            if self.moderation.tier_table_path.is_none() {
                warnings.push("production is using the built-in tier table".to_string());
            }
            if self.database.is_in_memory() {
                warnings.push(
                    "production is using an in-memory database; records will not survive a restart"
                        .to_string(),
                );
            }
        }

        Ok(warnings)
    }
}
