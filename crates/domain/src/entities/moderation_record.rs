//! Moderation record entity - Audit trail of a blocked or flagged content event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content_safety::{ActionKind, PiiKind, Severity};
use crate::value_objects::{ContentType, ModerationId, UserId};

/// Review status of a moderation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Waiting for a reviewer
    Pending,
    /// Reviewer judged the content acceptable
    Approved,
    /// Reviewer confirmed the content is not acceptable
    Rejected,
    /// Reviewer escalated the content (e.g. to school leadership)
    Flagged,
}

impl ModerationStatus {
    /// Check if this is a terminal state (no further changes possible)
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Stable lowercase name used in storage
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Flagged => "flagged",
        }
    }

    /// Parse a stable lowercase name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Privilege level of a reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    /// Class teacher
    Teacher,
    /// School moderator
    Moderator,
    /// Platform administrator
    Administrator,
}

impl ReviewerRole {
    /// Stable lowercase name used in storage
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Moderator => "moderator",
            Self::Administrator => "administrator",
        }
    }

    /// Parse a stable lowercase name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Some(Self::Teacher),
            "moderator" => Some(Self::Moderator),
            "administrator" | "admin" => Some(Self::Administrator),
            _ => None,
        }
    }
}

/// Someone acting on the review queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    /// Reviewer's user ID
    pub id: UserId,
    /// Reviewer's privilege level
    pub role: ReviewerRole,
}

impl Reviewer {
    /// Create a reviewer
    pub const fn new(id: UserId, role: ReviewerRole) -> Self {
        Self { id, role }
    }
}

/// Persisted audit entity for one evaluated content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRecord {
    /// Unique identifier
    pub id: ModerationId,
    /// Caller-supplied content tag
    pub content_type: ContentType,
    /// Opaque pointer back to the originating content
    pub content_ref: String,
    /// Author of the content
    pub author_id: UserId,
    /// Combined severity of the evaluation
    pub severity: Severity,
    /// Action taken at write time
    pub action: ActionKind,
    /// Whether the record was escalated for human review
    pub flagged: bool,
    /// Review status
    pub status: ModerationStatus,
    /// Masked copy of the content (never the raw text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_excerpt: Option<String>,
    /// Word-list matches found at write time
    #[serde(default)]
    pub flagged_terms: Vec<String>,
    /// PII kinds found at write time
    #[serde(default)]
    pub pii_kinds: Vec<PiiKind>,
    /// Who reviewed the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<UserId>,
    /// Privilege of the reviewer at review time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_role: Option<ReviewerRole>,
    /// Reviewer notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the underlying content was retracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_at: Option<DateTime<Utc>>,
}

impl ModerationRecord {
    /// Create a new pending record
    pub fn new(
        content_type: ContentType,
        content_ref: impl Into<String>,
        author_id: UserId,
        severity: Severity,
        action: ActionKind,
        flagged: bool,
    ) -> Self {
        Self {
            id: ModerationId::new(),
            content_type,
            content_ref: content_ref.into(),
            author_id,
            severity,
            action,
            flagged,
            status: ModerationStatus::Pending,
            masked_excerpt: None,
            flagged_terms: Vec::new(),
            pii_kinds: Vec::new(),
            reviewer_id: None,
            reviewer_role: None,
            review_notes: None,
            created_at: Utc::now(),
            reviewed_at: None,
            superseded_at: None,
        }
    }

    /// Attach the masked text
    #[must_use]
    pub fn with_masked_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.masked_excerpt = Some(excerpt.into());
        self
    }

    /// Attach the write-time findings
    #[must_use]
    pub fn with_findings(mut self, flagged_terms: Vec<String>, pii_kinds: Vec<PiiKind>) -> Self {
        self.flagged_terms = flagged_terms;
        self.pii_kinds = pii_kinds;
        self
    }

    /// Whether the record still awaits review
    pub fn is_pending(&self) -> bool {
        self.status == ModerationStatus::Pending
    }

    /// Whether the content was retracted after the fact
    pub const fn is_superseded(&self) -> bool {
        self.superseded_at.is_some()
    }

    /// Apply a review decision
    ///
    /// Returns `Err` if the record is not pending or the target status is not terminal.
    pub fn review(
        &mut self,
        reviewer: Reviewer,
        new_status: ModerationStatus,
        notes: Option<String>,
    ) -> Result<(), ReviewError> {
        if self.status.is_terminal() {
            return Err(ReviewError::AlreadyReviewed(self.status));
        }
        if !new_status.is_terminal() {
            return Err(ReviewError::NotTerminal);
        }
        self.status = new_status;
        self.reviewer_id = Some(reviewer.id);
        self.reviewer_role = Some(reviewer.role);
        self.review_notes = notes;
        self.reviewed_at = Some(Utc::now());
        Ok(())
    }

    /// Check whether `reviewer` may amend the notes of this record
    pub fn check_can_amend(&self, reviewer: &Reviewer) -> Result<(), ReviewError> {
        if self.is_pending() {
            return Err(ReviewError::NotReviewed);
        }
        let same_reviewer = self.reviewer_id == Some(reviewer.id);
        let higher_privilege = self
            .reviewer_role
            .is_none_or(|original| reviewer.role > original);
        if same_reviewer || higher_privilege {
            Ok(())
        } else {
            Err(ReviewError::InsufficientPrivilege)
        }
    }

    /// Replace the review notes; status stays untouched
    pub fn amend_notes(&mut self, reviewer: &Reviewer, notes: String) -> Result<(), ReviewError> {
        self.check_can_amend(reviewer)?;
        self.review_notes = Some(notes);
        Ok(())
    }

    /// Mark the underlying content as retracted
    pub fn supersede(&mut self) {
        if self.superseded_at.is_none() {
            self.superseded_at = Some(Utc::now());
        }
    }
}

/// Errors that can occur when reviewing a moderation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The record already left the pending state
    AlreadyReviewed(ModerationStatus),
    /// Review decisions must move to a terminal status
    NotTerminal,
    /// Notes can only be amended after a review
    NotReviewed,
    /// Reviewer is neither the original reviewer nor more privileged
    InsufficientPrivilege,
}

impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyReviewed(status) => {
                write!(f, "Moderation record already reviewed with status: {status}")
            },
            Self::NotTerminal => write!(f, "Review decision must be approved, rejected or flagged"),
            Self::NotReviewed => write!(f, "Moderation record has not been reviewed yet"),
            Self::InsufficientPrivilege => {
                write!(f, "Only the original or a higher-privileged reviewer may amend notes")
            },
        }
    }
}

impl std::error::Error for ReviewError {}
