//! PII detector - finds and masks personal information in free text
//!
//! Patterns run in priority order (national ID, email, phone). A later match
//! that overlaps an earlier finding is discarded, so a 13-digit national ID
//! is never reported as a phone number as well.

use domain::{PiiFinding, PiiKind, PiiResult};
use regex::Regex;
use tracing::debug;

use crate::error::ApplicationError;

// Each pattern captures the finding in group 1. Numeric kinds are bounded by
// non-digits rather than word boundaries, so "JMBG0101990710006" still counts.

/// 13-digit national identification number
const NATIONAL_ID_PATTERN: &str = r"(?:^|\D)(\d{13})(?:\D|$)";

/// local@domain with at least one dot in the domain
const EMAIL_PATTERN: &str = r"([A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,})\b";

/// Domestic mobile number: 06x or +381 6x, 9 or 10 digits, optional separators
const PHONE_PATTERN: &str = r"(?:^|\D)((?:\+381[ -]?|0)6\d[ /-]?\d{3}[ -]?\d{3,4})(?:\D|$)";

/// Detects emails, phone numbers and national IDs
#[derive(Debug, Clone)]
pub struct PiiDetector {
    patterns: Vec<(PiiKind, Regex)>,
}

impl PiiDetector {
    /// Compile the detection patterns
    pub fn new() -> Result<Self, ApplicationError> {
        let compile = |kind: PiiKind, source: &str| {
            Regex::new(source)
                .map(|re| (kind, re))
                .map_err(|e| ApplicationError::Configuration(format!("{kind} pattern: {e}")))
        };

        Ok(Self {
            patterns: vec![
                compile(PiiKind::NationalId, NATIONAL_ID_PATTERN)?,
                compile(PiiKind::Email, EMAIL_PATTERN)?,
                compile(PiiKind::Phone, PHONE_PATTERN)?,
            ],
        })
    }

    /// Scan `text` and mask every finding with its placeholder
    pub fn detect(&self, text: &str) -> PiiResult {
        let mut findings: Vec<PiiFinding> = Vec::new();

        for (kind, regex) in &self.patterns {
            // Resume at the end of the captured span, not the whole match, so
            // the separator after one finding can open the next
            let mut at = 0;
            while let Some(m) = regex.captures_at(text, at).and_then(|c| c.get(1)) {
                at = m.end();
                let overlaps = findings
                    .iter()
                    .any(|f| m.start() < f.end && f.start < m.end());
                if !overlaps {
                    findings.push(PiiFinding {
                        kind: *kind,
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }

        if findings.is_empty() {
            return PiiResult::none(text);
        }

        findings.sort_by_key(|f| f.start);

        let mut masked = String::with_capacity(text.len());
        let mut types = Vec::new();
        let mut cursor = 0;
        for finding in &findings {
            masked.push_str(&text[cursor..finding.start]);
            masked.push_str(finding.kind.placeholder());
            cursor = finding.end;
            if !types.contains(&finding.kind) {
                types.push(finding.kind);
            }
        }
        masked.push_str(&text[cursor..]);

        debug!(findings = findings.len(), "Personal information detected");

        PiiResult {
            detected: true,
            types,
            masked,
            findings,
        }
    }
}

/// Human-readable warning naming the detected kinds in the given order
///
/// Returns an empty string when `kinds` is empty.
#[must_use]
pub fn generate_warning(kinds: &[PiiKind]) -> String {
    if kinds.is_empty() {
        return String::new();
    }
    let labels = kinds
        .iter()
        .map(PiiKind::label)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "⚠️ Warning: this text contains personal information ({labels}). Please remove it before sharing."
    )
}
