//! Word-boundary-aware phrase substitution
//!
//! Shared by text simplification and auto-correction. Matching is
//! case-insensitive; the first letter of a replacement takes the case of the
//! first letter of the matched text.

use std::collections::HashMap;

use regex::{Captures, Regex, RegexBuilder};

use crate::error::ApplicationError;

/// A fixed table of phrase replacements compiled into one matcher
#[derive(Debug, Clone)]
pub struct WordSubstitution {
    matcher: Regex,
    replacements: HashMap<String, &'static str>,
}

impl WordSubstitution {
    /// Compile a substitution table
    ///
    /// Longer phrases win over shorter ones sharing a prefix.
    pub fn new(table: &[(&'static str, &'static str)]) -> Result<Self, ApplicationError> {
        if table.is_empty() {
            return Err(ApplicationError::Configuration(
                "substitution table is empty".to_string(),
            ));
        }

        let mut phrases: Vec<&str> = table.iter().map(|(from, _)| *from).collect();
        phrases.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));
        let alternation = phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let matcher = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|e| ApplicationError::Configuration(format!("substitution table: {e}")))?;

        let replacements = table
            .iter()
            .map(|(from, to)| (from.to_lowercase(), *to))
            .collect();

        Ok(Self {
            matcher,
            replacements,
        })
    }

    /// Apply every substitution to `text`
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.matcher
            .replace_all(text, |caps: &Captures<'_>| {
                let found = &caps[0];
                self.replacements
                    .get(&found.to_lowercase())
                    .map_or_else(|| found.to_string(), |to| match_case(found, to))
            })
            .into_owned()
    }
}

/// Give `replacement` the case of the first letter of `original`
fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
