//! Moderation record manager - audit trail and human review workflow
//!
//! Records are never deleted. A review is a single compare-and-set from
//! `Pending` to a terminal status; when two reviewers race, exactly one wins
//! and the other gets [`ApplicationError::AlreadyReviewed`].

use std::sync::Arc;

use chrono::Utc;
use domain::{ModerationId, ModerationRecord, ModerationStatus, ReviewError, Reviewer};
use tracing::{debug, info, instrument, warn};

use super::content_moderation_service::{ContentSubmission, Evaluation};
use crate::{
    error::ApplicationError,
    ports::{ModerationRecordStore, Page, RecordFilter, ReviewUpdate},
};

/// Service owning the moderation record lifecycle
pub struct ModerationRecordManager {
    store: Arc<dyn ModerationRecordStore>,
}

impl std::fmt::Debug for ModerationRecordManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationRecordManager")
            .finish_non_exhaustive()
    }
}

impl ModerationRecordManager {
    /// Create a new record manager
    pub fn new(store: Arc<dyn ModerationRecordStore>) -> Self {
        Self { store }
    }

    /// Persist a pending record for an evaluated submission
    ///
    /// Only the masked text is stored; the raw input never reaches the store.
    #[instrument(skip_all, fields(content_type = %submission.content_type, action = %evaluation.decision.action()))]
    pub async fn create_record(
        &self,
        evaluation: &Evaluation,
        submission: &ContentSubmission,
    ) -> Result<ModerationRecord, ApplicationError> {
        let record = ModerationRecord::new(
            submission.content_type,
            submission.content_ref.clone(),
            submission.author_id,
            evaluation.severity,
            evaluation.decision.action(),
            evaluation.decision.notify_admin(),
        )
        .with_masked_excerpt(evaluation.masked_text.clone())
        .with_findings(
            evaluation.classification.flagged_terms.clone(),
            evaluation.pii.types.clone(),
        );

        self.store.put(&record).await?;
        info!(
            record_id = %record.id,
            severity = %record.severity,
            flagged = record.flagged,
            "Moderation record created"
        );
        Ok(record)
    }

    /// Get a record by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: &ModerationId) -> Result<ModerationRecord, ApplicationError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Moderation record {id}")))
    }

    /// List pending records, oldest first
    #[instrument(skip(self))]
    pub async fn list_pending(
        &self,
        filter: RecordFilter,
        page: Page,
    ) -> Result<Vec<ModerationRecord>, ApplicationError> {
        let records = self
            .store
            .list_by_status(ModerationStatus::Pending, filter, page)
            .await?;
        debug!(count = records.len(), "Listed pending records");
        Ok(records)
    }

    /// Move a pending record to a terminal status
    ///
    /// Fails with `AlreadyReviewed` if the record is no longer pending,
    /// including when a concurrent reviewer got there first.
    #[instrument(skip(self, notes), fields(reviewer_id = %reviewer.id, role = reviewer.role.as_str()))]
    pub async fn review(
        &self,
        id: &ModerationId,
        reviewer: Reviewer,
        new_status: ModerationStatus,
        notes: Option<String>,
    ) -> Result<ModerationRecord, ApplicationError> {
        if !new_status.is_terminal() {
            return Err(ApplicationError::InvalidOperation(
                "review target must be approved, rejected or flagged".to_string(),
            ));
        }

        let mut record = self.get(id).await?;
        record
            .review(reviewer, new_status, notes.clone())
            .map_err(|e| review_error(*id, e))?;

        let update = ReviewUpdate {
            status: new_status,
            reviewer,
            notes,
            reviewed_at: record.reviewed_at.unwrap_or_else(Utc::now),
        };

        let won = self
            .store
            .compare_and_set_status(id, ModerationStatus::Pending, update)
            .await?;

        if !won {
            let current = self
                .store
                .get_by_id(id)
                .await?
                .map_or(ModerationStatus::Pending, |r| r.status);
            warn!(record_id = %id, status = %current, "Lost review race");
            return Err(ApplicationError::AlreadyReviewed {
                id: *id,
                status: current,
            });
        }

        info!(record_id = %id, status = %new_status, "Moderation record reviewed");
        Ok(record)
    }

    /// Replace the notes of a reviewed record
    ///
    /// Allowed for the original reviewer or a strictly higher role. The
    /// status never changes.
    #[instrument(skip(self, notes), fields(reviewer_id = %reviewer.id))]
    pub async fn amend_notes(
        &self,
        id: &ModerationId,
        reviewer: &Reviewer,
        notes: String,
    ) -> Result<ModerationRecord, ApplicationError> {
        let mut record = self.get(id).await?;
        record
            .amend_notes(reviewer, notes.clone())
            .map_err(|e| review_error(*id, e))?;

        if !self.store.update_review_notes(id, notes).await? {
            return Err(ApplicationError::NotFound(format!("Moderation record {id}")));
        }

        info!(record_id = %id, "Review notes amended");
        Ok(record)
    }

    /// Mark the underlying content as retracted; the record itself stays
    #[instrument(skip(self))]
    pub async fn supersede(&self, id: &ModerationId) -> Result<ModerationRecord, ApplicationError> {
        let mut record = self.get(id).await?;
        if record.is_superseded() {
            return Ok(record);
        }
        record.supersede();
        let at = record.superseded_at.unwrap_or_else(Utc::now);

        if !self.store.mark_superseded(id, at).await? {
            return Err(ApplicationError::NotFound(format!("Moderation record {id}")));
        }

        info!(record_id = %id, "Moderation record superseded");
        Ok(record)
    }
}

fn review_error(id: ModerationId, err: ReviewError) -> ApplicationError {
    match err {
        ReviewError::AlreadyReviewed(status) => ApplicationError::AlreadyReviewed { id, status },
        ReviewError::NotTerminal | ReviewError::NotReviewed => {
            ApplicationError::InvalidOperation(err.to_string())
        },
        ReviewError::InsufficientPrivilege => ApplicationError::NotAuthorized(err.to_string()),
    }
}
