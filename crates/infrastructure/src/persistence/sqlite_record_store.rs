//! SQLite adapter for the ModerationRecordStore port
//!
//! Reviews use a conditional `UPDATE ... WHERE status = ?` so concurrent
//! reviewers across processes race on the database, not in memory.

use application::{
    error::ApplicationError,
    ports::{ModerationRecordStore, Page, RecordFilter, ReviewUpdate},
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{
    ActionKind, ContentType, ModerationId, ModerationRecord, ModerationStatus, PiiKind,
    ReviewerRole, Severity, UserId,
};
use sqlx::SqlitePool;

use super::error::map_sqlx_error;

const SELECT_COLUMNS: &str = "SELECT id, content_type, content_ref, author_id, severity, action, flagged, status,
        masked_excerpt, flagged_terms, pii_kinds, reviewer_id, reviewer_role, review_notes,
        created_at, reviewed_at, superseded_at
 FROM moderation_records";

/// SQLite implementation of the moderation record store
#[derive(Debug, Clone)]
pub struct SqliteModerationRecordStore {
    pool: SqlitePool,
}

impl SqliteModerationRecordStore {
    /// Create a new SQLite record store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationRecordStore for SqliteModerationRecordStore {
    async fn put(&self, record: &ModerationRecord) -> Result<(), ApplicationError> {
        let flagged_terms = serde_json::to_string(&record.flagged_terms).map_err(|e| {
            ApplicationError::Internal(format!("Failed to serialize flagged terms: {e}"))
        })?;
        let pii_kinds = serde_json::to_string(&record.pii_kinds)
            .map_err(|e| ApplicationError::Internal(format!("Failed to serialize PII kinds: {e}")))?;

        sqlx::query(
            "INSERT INTO moderation_records
             (id, content_type, content_ref, author_id, severity, action, flagged, status,
              masked_excerpt, flagged_terms, pii_kinds, reviewer_id, reviewer_role, review_notes,
              created_at, reviewed_at, superseded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(record.id.to_string())
        .bind(record.content_type.as_str())
        .bind(&record.content_ref)
        .bind(record.author_id.to_string())
        .bind(record.severity.as_str())
        .bind(record.action.as_str())
        .bind(record.flagged)
        .bind(record.status.as_str())
        .bind(&record.masked_excerpt)
        .bind(&flagged_terms)
        .bind(&pii_kinds)
        .bind(record.reviewer_id.map(|id| id.to_string()))
        .bind(record.reviewer_role.map(|r| r.as_str()))
        .bind(&record.review_notes)
        .bind(timestamp(record.created_at))
        .bind(record.reviewed_at.map(timestamp))
        .bind(record.superseded_at.map(timestamp))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        id: &ModerationId,
    ) -> Result<Option<ModerationRecord>, ApplicationError> {
        let row: Option<RecordRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(RecordRow::to_record).transpose()
    }

    async fn compare_and_set_status(
        &self,
        id: &ModerationId,
        expected: ModerationStatus,
        update: ReviewUpdate,
    ) -> Result<bool, ApplicationError> {
        let result = sqlx::query(
            "UPDATE moderation_records
             SET status = $1, reviewer_id = $2, reviewer_role = $3, review_notes = $4, reviewed_at = $5
             WHERE id = $6 AND status = $7",
        )
        .bind(update.status.as_str())
        .bind(update.reviewer.id.to_string())
        .bind(update.reviewer.role.as_str())
        .bind(&update.notes)
        .bind(timestamp(update.reviewed_at))
        .bind(id.to_string())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: RecordFilter,
        page: Page,
    ) -> Result<Vec<ModerationRecord>, ApplicationError> {
        let rows: Vec<RecordRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS}
             WHERE status = $1
               AND ($2 IS NULL OR content_type = $2)
               AND ($3 IS NULL OR author_id = $3)
               AND ($4 IS NULL OR flagged = $4)
             ORDER BY created_at ASC, rowid ASC
             LIMIT $5 OFFSET $6"
        ))
        .bind(status.as_str())
        .bind(filter.content_type.map(|ct| ct.as_str()))
        .bind(filter.author_id.map(|a| a.to_string()))
        .bind(filter.flagged)
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(RecordRow::to_record).collect()
    }

    async fn update_review_notes(
        &self,
        id: &ModerationId,
        notes: String,
    ) -> Result<bool, ApplicationError> {
        let result = sqlx::query("UPDATE moderation_records SET review_notes = $1 WHERE id = $2")
            .bind(&notes)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_superseded(
        &self,
        id: &ModerationId,
        at: DateTime<Utc>,
    ) -> Result<bool, ApplicationError> {
        let result = sqlx::query(
            "UPDATE moderation_records
             SET superseded_at = COALESCE(superseded_at, $1)
             WHERE id = $2",
        )
        .bind(timestamp(at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

/// Fixed-width RFC 3339 so that text ordering equals time ordering
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::Internal(format!("Invalid {field}: {e}")))
}

fn invalid(field: &str, value: &str) -> ApplicationError {
    ApplicationError::Internal(format!("Invalid {field}: {value}"))
}

/// Row type for record queries
#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    content_type: String,
    content_ref: String,
    author_id: String,
    severity: String,
    action: String,
    flagged: bool,
    status: String,
    masked_excerpt: Option<String>,
    flagged_terms: String,
    pii_kinds: String,
    reviewer_id: Option<String>,
    reviewer_role: Option<String>,
    review_notes: Option<String>,
    created_at: String,
    reviewed_at: Option<String>,
    superseded_at: Option<String>,
}

impl RecordRow {
    fn to_record(self) -> Result<ModerationRecord, ApplicationError> {
        let id = ModerationId::parse(&self.id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid record id: {e}")))?;
        let author_id = UserId::parse(&self.author_id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid author_id: {e}")))?;
        let content_type: ContentType = self
            .content_type
            .parse()
            .map_err(|_| invalid("content_type", &self.content_type))?;
        let severity =
            Severity::from_name(&self.severity).ok_or_else(|| invalid("severity", &self.severity))?;
        let action =
            ActionKind::from_name(&self.action).ok_or_else(|| invalid("action", &self.action))?;
        let status = ModerationStatus::from_name(&self.status)
            .ok_or_else(|| invalid("status", &self.status))?;
        let flagged_terms: Vec<String> = serde_json::from_str(&self.flagged_terms)
            .map_err(|e| ApplicationError::Internal(format!("Invalid flagged_terms JSON: {e}")))?;
        let pii_kinds: Vec<PiiKind> = serde_json::from_str(&self.pii_kinds)
            .map_err(|e| ApplicationError::Internal(format!("Invalid pii_kinds JSON: {e}")))?;
        let reviewer_id = self
            .reviewer_id
            .as_deref()
            .map(UserId::parse)
            .transpose()
            .map_err(|e| ApplicationError::Internal(format!("Invalid reviewer_id: {e}")))?;
        let reviewer_role = self
            .reviewer_role
            .as_deref()
            .map(|r| ReviewerRole::from_name(r).ok_or_else(|| invalid("reviewer_role", r)))
            .transpose()?;

        Ok(ModerationRecord {
            id,
            content_type,
            content_ref: self.content_ref,
            author_id,
            severity,
            action,
            flagged: self.flagged,
            status,
            masked_excerpt: self.masked_excerpt,
            flagged_terms,
            pii_kinds,
            reviewer_id,
            reviewer_role,
            review_notes: self.review_notes,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            reviewed_at: self
                .reviewed_at
                .as_deref()
                .map(|v| parse_timestamp("reviewed_at", v))
                .transpose()?,
            superseded_at: self
                .superseded_at
                .as_deref()
                .map(|v| parse_timestamp("superseded_at", v))
                .transpose()?,
        })
    }
}
