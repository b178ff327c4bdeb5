//! In-memory moderation record store
//!
//! Single-process adapter for callers that embed the pipeline without a
//! database, and for tests. All mutations take the write lock, so
//! compare-and-set is atomic within the process.

use std::{collections::HashMap, sync::Arc};

use application::{
    error::ApplicationError,
    ports::{ModerationRecordStore, Page, RecordFilter, ReviewUpdate},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ModerationId, ModerationRecord, ModerationStatus};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct RecordTable {
    records: Vec<ModerationRecord>,
    index: HashMap<ModerationId, usize>,
}

impl RecordTable {
    fn get_mut(&mut self, id: &ModerationId) -> Option<&mut ModerationRecord> {
        let idx = *self.index.get(id)?;
        self.records.get_mut(idx)
    }
}

/// In-memory implementation of the record store
#[derive(Debug, Clone, Default)]
pub struct InMemoryModerationRecordStore {
    data: Arc<RwLock<RecordTable>>,
}

impl InMemoryModerationRecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.data.read().records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ModerationRecordStore for InMemoryModerationRecordStore {
    async fn put(&self, record: &ModerationRecord) -> Result<(), ApplicationError> {
        let mut table = self.data.write();
        if table.index.contains_key(&record.id) {
            return Err(ApplicationError::Internal(format!(
                "Duplicate moderation record {}",
                record.id
            )));
        }
        let idx = table.records.len();
        table.records.push(record.clone());
        table.index.insert(record.id, idx);
        debug!(record_id = %record.id, "Stored moderation record");
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: &ModerationId,
    ) -> Result<Option<ModerationRecord>, ApplicationError> {
        let table = self.data.read();
        Ok(table
            .index
            .get(id)
            .and_then(|idx| table.records.get(*idx))
            .cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: &ModerationId,
        expected: ModerationStatus,
        update: ReviewUpdate,
    ) -> Result<bool, ApplicationError> {
        let mut table = self.data.write();
        let Some(record) = table.get_mut(id) else {
            return Ok(false);
        };
        if record.status != expected {
            return Ok(false);
        }
        record.status = update.status;
        record.reviewer_id = Some(update.reviewer.id);
        record.reviewer_role = Some(update.reviewer.role);
        record.review_notes = update.notes;
        record.reviewed_at = Some(update.reviewed_at);
        Ok(true)
    }

    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: RecordFilter,
        page: Page,
    ) -> Result<Vec<ModerationRecord>, ApplicationError> {
        let table = self.data.read();
        let mut matching: Vec<&ModerationRecord> = table
            .records
            .iter()
            .filter(|r| r.status == status && filter.matches(r))
            .collect();
        matching.sort_by_key(|r| r.created_at);

        Ok(matching
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_review_notes(
        &self,
        id: &ModerationId,
        notes: String,
    ) -> Result<bool, ApplicationError> {
        let mut table = self.data.write();
        Ok(table.get_mut(id).map(|r| r.review_notes = Some(notes)).is_some())
    }

    async fn mark_superseded(
        &self,
        id: &ModerationId,
        at: DateTime<Utc>,
    ) -> Result<bool, ApplicationError> {
        let mut table = self.data.write();
        Ok(table
            .get_mut(id)
            .map(|r| {
                r.superseded_at.get_or_insert(at);
            })
            .is_some())
    }
}
