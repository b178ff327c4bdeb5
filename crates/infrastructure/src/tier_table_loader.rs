//! Tier table loading
//!
//! Reads a custom tier table from disk. The format is chosen by file
//! extension: `.json` or `.toml`.

use std::path::Path;

use application::{ApplicationError, LexicalClassifier};
use domain::TierTable;
use tracing::{info, instrument};

/// Load and validate a tier table file
#[instrument]
pub fn load_tier_table(path: &Path) -> Result<TierTable, ApplicationError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ApplicationError::Configuration(format!(
            "cannot read tier table {}: {e}",
            path.display()
        ))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let table: TierTable = match extension.as_deref() {
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            ApplicationError::Configuration(format!("invalid tier table JSON: {e}"))
        })?,
        Some("toml") => toml::from_str(&contents).map_err(|e| {
            ApplicationError::Configuration(format!("invalid tier table TOML: {e}"))
        })?,
        _ => {
            return Err(ApplicationError::Configuration(format!(
                "unsupported tier table format: {} (expected .json or .toml)",
                path.display()
            )));
        },
    };

    let table = table
        .validated()
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
    info!(
        version = %table.version,
        terms = table.terms.len(),
        patterns = table.patterns.len(),
        "Tier table loaded"
    );
    Ok(table)
}

/// Build the classifier from a custom table, or the built-in one when `path` is `None`
pub fn load_classifier(path: Option<&Path>) -> Result<LexicalClassifier, ApplicationError> {
    match path {
        Some(path) => LexicalClassifier::new(load_tier_table(path)?),
        None => LexicalClassifier::with_default_table(),
    }
}
