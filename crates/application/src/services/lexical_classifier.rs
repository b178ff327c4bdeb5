//! Lexical classifier - tiered word lists and bullying patterns
//!
//! Word lists are matched by case-insensitive substring containment with one
//! leftmost-longest automaton per tier. Regex patterns run against the
//! original text with a compiled-size cap; the `regex` engine is linear in
//! the input, so no pattern can backtrack catastrophically.
//!
//! Matching happens on a lowercased shadow of the input. A byte-offset map
//! from the shadow back to the original lets the classifier report flagged
//! terms as the user spelled them and mask the exact original spans.

use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, MatchKind};
use domain::{ClassificationResult, Severity, Tier, TierTable};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::ApplicationError;

/// Constant-width replacement for every flagged span
pub const MASK: &str = "****";

/// Compiled size cap for a single pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Built-in detection table
const DEFAULT_TIER_TABLE: &str = include_str!("default_tiers.json");

/// Parse the built-in detection table
pub fn builtin_tier_table() -> Result<TierTable, ApplicationError> {
    serde_json::from_str(DEFAULT_TIER_TABLE)
        .map_err(|e| ApplicationError::Configuration(format!("built-in tier table: {e}")))
}

struct TierMatcher {
    tier: Tier,
    automaton: AhoCorasick,
    terms: Vec<String>,
}

struct CompiledPattern {
    name: String,
    severity: Severity,
    regex: Regex,
}

/// Compiled tier table
pub struct LexicalClassifier {
    version: String,
    matchers: Vec<TierMatcher>,
    patterns: Vec<CompiledPattern>,
    exceptions: HashMap<String, Vec<String>>,
}

impl std::fmt::Debug for LexicalClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalClassifier")
            .field("version", &self.version)
            .field("tiers", &self.matchers.len())
            .field("patterns", &self.patterns.len())
            .finish_non_exhaustive()
    }
}

impl LexicalClassifier {
    /// Validate and compile a tier table
    ///
    /// Any malformed entry is a configuration error; nothing is compiled lazily.
    pub fn new(table: TierTable) -> Result<Self, ApplicationError> {
        let table = table
            .validated()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        if let Some(entry) = table.terms.iter().find(|t| t.term.contains('*')) {
            return Err(ApplicationError::Configuration(format!(
                "term '{}' contains the mask character",
                entry.term
            )));
        }

        let mut matchers = Vec::new();
        for tier in Tier::all() {
            let terms: Vec<String> = table.terms_in(*tier).map(|t| t.term.clone()).collect();
            if terms.is_empty() {
                continue;
            }
            let automaton = AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&terms)
                .map_err(|e| ApplicationError::Configuration(format!("tier {tier}: {e}")))?;
            matchers.push(TierMatcher {
                tier: *tier,
                automaton,
                terms,
            });
        }

        let patterns = table
            .patterns
            .iter()
            .map(|entry| {
                let regex = RegexBuilder::new(&entry.pattern)
                    .size_limit(PATTERN_SIZE_LIMIT)
                    .build()
                    .map_err(|e| {
                        ApplicationError::Configuration(format!(
                            "pattern '{}': {e}",
                            entry.name
                        ))
                    })?;
                Ok(CompiledPattern {
                    name: entry.name.clone(),
                    severity: entry.tier.severity().max(Severity::Severe),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, ApplicationError>>()?;

        let mut exceptions: HashMap<String, Vec<String>> = HashMap::new();
        for exception in table.exceptions {
            exceptions
                .entry(exception.word)
                .or_default()
                .push(exception.followed_by);
        }

        debug!(
            version = %table.version,
            terms = table.terms.len(),
            patterns = patterns.len(),
            "Compiled tier table"
        );

        Ok(Self {
            version: table.version,
            matchers,
            patterns,
            exceptions,
        })
    }

    /// Compile the built-in detection table
    pub fn with_default_table() -> Result<Self, ApplicationError> {
        Self::new(builtin_tier_table()?)
    }

    /// Version of the compiled table
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Classify `text`
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.is_empty() {
            return ClassificationResult::clean(text);
        }

        let shadow = LoweredText::new(text);
        let mut severity = Severity::None;
        let mut flagged_terms = Vec::new();
        let mut flagged_lower = HashSet::new();
        let mut spans = Vec::new();
        let mut exempt_spans: Vec<(&str, (usize, usize))> = Vec::new();

        for matcher in &self.matchers {
            for m in matcher.automaton.find_iter(&shadow.text) {
                let term = matcher.terms[m.pattern().as_usize()].as_str();
                let span = shadow.original_span(text, m.start(), m.end());
                if self.is_exempt(&shadow.text, term, m.end()) {
                    exempt_spans.push((term, span));
                    continue;
                }
                flagged_terms.push(text[span.0..span.1].to_string());
                flagged_lower.insert(term);
                spans.push(span);
                severity = severity.max(matcher.tier.severity());
            }
        }

        // An exempt occurrence of a term that is flagged elsewhere is masked
        // too, so the flagged spelling never survives in the filtered text.
        spans.extend(
            exempt_spans
                .into_iter()
                .filter(|(term, _)| flagged_lower.contains(term))
                .map(|(_, span)| span),
        );

        let mut matched_patterns = Vec::new();
        for pattern in &self.patterns {
            if pattern.regex.is_match(text) {
                matched_patterns.push(pattern.name.clone());
                severity = severity.max(pattern.severity);
            }
        }

        ClassificationResult {
            safe: severity == Severity::None,
            filtered_text: mask_spans(text, spans),
            flagged_terms,
            matched_patterns,
            severity,
        }
    }

    fn is_exempt(&self, lowered: &str, term: &str, end: usize) -> bool {
        self.exceptions.get(term).is_some_and(|qualifiers| {
            qualifiers
                .iter()
                .any(|q| lowered[end..].starts_with(q.as_str()))
        })
    }
}

/// Lowercased copy of a text with a map back to original byte offsets
struct LoweredText {
    text: String,
    origin: Vec<usize>,
}

impl LoweredText {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (idx, ch) in original.char_indices() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.extend(std::iter::repeat_n(idx, lower.len_utf8()));
            }
        }
        Self { text, origin }
    }

    /// Map a non-empty shadow range to the original characters it covers
    fn original_span(&self, original: &str, start: usize, end: usize) -> (usize, usize) {
        let first = self.origin[start];
        let last = self.origin[end - 1];
        let last_len = original[last..].chars().next().map_or(0, char::len_utf8);
        (first, last + last_len)
    }
}

/// Replace each merged span with [`MASK`]
fn mask_spans(text: &str, mut spans: Vec<(usize, usize)>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    spans.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in merged {
        out.push_str(&text[cursor..start]);
        out.push_str(MASK);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}
