//! Versioned tier table - the word lists and patterns behind the lexical classifier
//!
//! The table is a data asset: it is loaded, validated and then compiled by the
//! application layer. Structural checks live here; regex compilation does not.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::content_safety::Tier;
use crate::errors::DomainError;

/// A literal term flagged by substring containment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    /// The term, matched case-insensitively
    pub term: String,
    /// Tier the term belongs to
    pub tier: Tier,
}

/// A regular expression matched against the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Short identifier reported when the pattern matches
    pub name: String,
    /// Regular expression source
    pub pattern: String,
    /// Declared tier; pattern matches are never weaker than bullying
    pub tier: Tier,
}

/// An exempted context: `word` immediately followed by `followed_by`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextException {
    /// A term from the word lists
    pub word: String,
    /// Qualifier that must directly follow the word
    pub followed_by: String,
}

/// The full, versioned detection table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Version string of this table
    pub version: String,
    /// Word-list entries
    #[serde(default)]
    pub terms: Vec<TermEntry>,
    /// Regex entries
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
    /// Context exceptions
    #[serde(default)]
    pub exceptions: Vec<ContextException>,
}

impl TierTable {
    /// Validate the structure and lowercase all terms
    ///
    /// Returns the normalized table or the first problem found.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        if self.version.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "tier table version is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &mut self.terms {
            let term = entry.term.trim().to_lowercase();
            if term.is_empty() {
                return Err(DomainError::ValidationError(format!(
                    "blank term in tier {}",
                    entry.tier
                )));
            }
            if !seen.insert(term.clone()) {
                return Err(DomainError::ValidationError(format!(
                    "term '{term}' is listed more than once"
                )));
            }
            entry.term = term;
        }

        for entry in &self.patterns {
            if entry.name.trim().is_empty() || entry.pattern.trim().is_empty() {
                return Err(DomainError::ValidationError(format!(
                    "pattern entry '{}' has a blank name or pattern",
                    entry.name
                )));
            }
        }

        for exception in &mut self.exceptions {
            let word = exception.word.trim().to_lowercase();
            if !seen.contains(&word) {
                return Err(DomainError::ValidationError(format!(
                    "exception word '{word}' is not a listed term"
                )));
            }
            if exception.followed_by.is_empty() {
                return Err(DomainError::ValidationError(format!(
                    "exception for '{word}' has an empty qualifier"
                )));
            }
            exception.word = word;
            exception.followed_by = exception.followed_by.to_lowercase();
        }

        Ok(self)
    }

    /// Terms of a single tier, in table order
    pub fn terms_in(&self, tier: Tier) -> impl Iterator<Item = &TermEntry> {
        self.terms.iter().filter(move |t| t.tier == tier)
    }
}
