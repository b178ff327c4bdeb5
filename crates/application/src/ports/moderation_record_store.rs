//! Port for moderation record persistence
//!
//! The review workflow needs only a narrow contract: insert, fetch, list by
//! status, and an atomic compare-and-set on the review status. Adapters must
//! implement the compare-and-set as a single conditional update so that
//! concurrent reviewers on different processes cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ContentType, ModerationId, ModerationRecord, ModerationStatus, Reviewer, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Filter criteria for listing records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Only records of this content type
    pub content_type: Option<ContentType>,
    /// Only records by this author
    pub author_id: Option<UserId>,
    /// Only records with this escalation flag
    pub flagged: Option<bool>,
}

impl RecordFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by content type
    #[must_use]
    pub const fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Filter by author
    #[must_use]
    pub const fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Filter by escalation flag
    #[must_use]
    pub const fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = Some(flagged);
        self
    }

    /// Check whether a record satisfies this filter
    pub fn matches(&self, record: &ModerationRecord) -> bool {
        self.content_type.is_none_or(|ct| record.content_type == ct)
            && self.author_id.is_none_or(|a| record.author_id == a)
            && self.flagged.is_none_or(|f| record.flagged == f)
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of results
    pub limit: u32,
    /// Number of results to skip
    pub offset: u32,
}

impl Page {
    /// Largest page the store will return
    pub const MAX_LIMIT: u32 = 500;

    /// Create a page, clamping the limit to `1..=MAX_LIMIT`
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(50, 0)
    }
}

/// Fields written by a successful review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    /// Terminal status to set
    pub status: ModerationStatus,
    /// Who reviewed
    pub reviewer: Reviewer,
    /// Optional reviewer notes
    pub notes: Option<String>,
    /// Review timestamp
    pub reviewed_at: DateTime<Utc>,
}

/// Port for moderation record storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModerationRecordStore: Send + Sync {
    /// Insert a new record
    async fn put(&self, record: &ModerationRecord) -> Result<(), ApplicationError>;

    /// Get a record by ID
    async fn get_by_id(
        &self,
        id: &ModerationId,
    ) -> Result<Option<ModerationRecord>, ApplicationError>;

    /// Atomically apply `update` if the record's status equals `expected`
    ///
    /// Returns `true` iff this call changed the record.
    async fn compare_and_set_status(
        &self,
        id: &ModerationId,
        expected: ModerationStatus,
        update: ReviewUpdate,
    ) -> Result<bool, ApplicationError>;

    /// List records with the given status, oldest first
    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: RecordFilter,
        page: Page,
    ) -> Result<Vec<ModerationRecord>, ApplicationError>;

    /// Replace the review notes of a record; returns `false` if unknown
    async fn update_review_notes(
        &self,
        id: &ModerationId,
        notes: String,
    ) -> Result<bool, ApplicationError>;

    /// Set `superseded_at` if not already set; returns `false` if unknown
    async fn mark_superseded(
        &self,
        id: &ModerationId,
        at: DateTime<Utc>,
    ) -> Result<bool, ApplicationError>;
}
