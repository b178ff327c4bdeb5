//! Content safety entities produced by the classification pipeline
//!
//! This module provides the severity scale, the per-call results of the
//! lexical classifier, PII detector and age evaluator, and the decision
//! table that maps a severity to a moderation action.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal classification outcome driving the moderation action
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Nothing matched
    #[default]
    None,
    /// Mild insult
    Mild,
    /// Profanity, or personal information
    Moderate,
    /// Bullying pattern
    Severe,
    /// Discriminatory, violent, sexual or controlled-substance content
    Critical,
}

impl Severity {
    /// Returns all severities in ascending order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::Mild,
            Self::Moderate,
            Self::Severe,
            Self::Critical,
        ]
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
        }
    }

    /// Parse a stable lowercase name
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity bucket with an associated detection list or pattern set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Tier 1
    MildInsult,
    /// Tier 2
    Profanity,
    /// Tier 3, regex patterns
    Bullying,
    /// Tier 4
    Discriminatory,
    /// Tier 5
    Violence,
    /// Tier 6
    SexualOrSubstance,
}

impl Tier {
    /// Returns all tiers in scan order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::MildInsult,
            Self::Profanity,
            Self::Bullying,
            Self::Discriminatory,
            Self::Violence,
            Self::SexualOrSubstance,
        ]
    }

    /// Severity triggered by a match in this tier
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::MildInsult => Severity::Mild,
            Self::Profanity => Severity::Moderate,
            Self::Bullying => Severity::Severe,
            Self::Discriminatory | Self::Violence | Self::SexualOrSubstance => Severity::Critical,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MildInsult => "mild_insult",
            Self::Profanity => "profanity",
            Self::Bullying => "bullying",
            Self::Discriminatory => "discriminatory",
            Self::Violence => "violence",
            Self::SexualOrSubstance => "sexual_or_substance",
        };
        write!(f, "{s}")
    }
}

/// Result of running the lexical classifier over one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// True iff no tier matched
    pub safe: bool,
    /// Literal word-list matches as spelled in the input, in scan order
    pub flagged_terms: Vec<String>,
    /// Names of the regex patterns that matched
    pub matched_patterns: Vec<String>,
    /// Input with every flagged term replaced by a constant-width mask
    pub filtered_text: String,
    /// Highest severity triggered
    pub severity: Severity,
}

impl ClassificationResult {
    /// Create a result for text where nothing matched
    #[must_use]
    pub fn clean(text: impl Into<String>) -> Self {
        Self {
            safe: true,
            flagged_terms: Vec::new(),
            matched_patterns: Vec::new(),
            filtered_text: text.into(),
            severity: Severity::None,
        }
    }
}

/// Kind of personally identifiable information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    /// local@domain address
    Email,
    /// Domestic mobile number
    Phone,
    /// 13-digit national identifier
    NationalId,
}

impl PiiKind {
    /// Human-readable label used in warnings
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::NationalId => "national ID",
        }
    }

    /// Fixed placeholder replacing the whole detected span
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Email => "[EMAIL]",
            Self::Phone => "[PHONE]",
            Self::NationalId => "[NATIONAL_ID]",
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::NationalId => "national_id",
        };
        write!(f, "{s}")
    }
}

/// One detected PII span (byte offsets into the scanned text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiFinding {
    /// Kind of information found
    pub kind: PiiKind,
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// Result of scanning a text for personal information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiResult {
    /// Whether anything was found
    pub detected: bool,
    /// Unique kinds, first-seen order
    pub types: Vec<PiiKind>,
    /// Input with every finding replaced by its placeholder
    pub masked: String,
    /// Individual findings ordered by position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<PiiFinding>,
}

impl PiiResult {
    /// Create a result with no findings
    #[must_use]
    pub fn none(text: impl Into<String>) -> Self {
        Self {
            detected: false,
            types: Vec::new(),
            masked: text.into(),
            findings: Vec::new(),
        }
    }

    /// Check whether a given kind was found
    #[must_use]
    pub fn contains(&self, kind: PiiKind) -> bool {
        self.types.contains(&kind)
    }
}

/// Age-appropriateness verdict for an author age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAppropriateness {
    /// Whether the content suits the author's age band
    pub appropriate: bool,
    /// Minimum age the content is suitable for, when stricter than the author's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_age: Option<u8>,
}

impl AgeAppropriateness {
    /// Content is fine for this age
    #[must_use]
    pub const fn appropriate() -> Self {
        Self {
            appropriate: true,
            suggested_age: None,
        }
    }

    /// Content needs an author of at least `age`
    #[must_use]
    pub const fn requires_age(age: u8) -> Self {
        Self {
            appropriate: false,
            suggested_age: Some(age),
        }
    }
}

/// Moderation action, strictly ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Store and display as-is
    Allow,
    /// Store, show the author a warning
    Warn,
    /// Store the filtered/masked text instead of the raw input
    Filter,
    /// Reject the write
    Block,
    /// Reject the write and escalate to a human reviewer
    Flag,
}

impl ActionKind {
    /// Whether the write must be rejected
    #[must_use]
    pub const fn rejects_write(&self) -> bool {
        matches!(self, Self::Block | Self::Flag)
    }

    /// Whether a moderation record must be persisted
    #[must_use]
    pub const fn requires_record(&self) -> bool {
        self.rejects_write()
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Filter => "filter",
            Self::Block => "block",
            Self::Flag => "flag",
        }
    }

    /// Parse a stable lowercase name
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        [Self::Allow, Self::Warn, Self::Filter, Self::Block, Self::Flag]
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation decision for a severity
///
/// The notification flags are derived from the severity and cannot be
/// set independently; construct values through [`ModerationAction::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModerationAction {
    action: ActionKind,
    notify_guardian: bool,
    notify_admin: bool,
}

impl ModerationAction {
    /// Map a severity to its action and notification flags
    #[must_use]
    pub const fn decide(severity: Severity) -> Self {
        let (action, notify_guardian, notify_admin) = match severity {
            Severity::None => (ActionKind::Allow, false, false),
            Severity::Mild => (ActionKind::Warn, false, false),
            Severity::Moderate => (ActionKind::Filter, true, false),
            Severity::Severe => (ActionKind::Block, true, true),
            Severity::Critical => (ActionKind::Flag, true, true),
        };
        Self {
            action,
            notify_guardian,
            notify_admin,
        }
    }

    /// The action to apply
    #[must_use]
    pub const fn action(&self) -> ActionKind {
        self.action
    }

    /// Whether the author's guardian must be notified
    #[must_use]
    pub const fn notify_guardian(&self) -> bool {
        self.notify_guardian
    }

    /// Whether an administrator must review
    #[must_use]
    pub const fn notify_admin(&self) -> bool {
        self.notify_admin
    }
}
