//! Content moderation service - the pipeline every user-authored write goes through
//!
//! normalize → PII detection + lexical classification → combined severity →
//! decision → (optional) audit record. The pure assessment is synchronous; only
//! persistence touches the record store.

use std::sync::Arc;

use domain::{
    ClassificationResult, ContentType, ModerationAction, ModerationId, PiiResult, Severity, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{
    lexical_classifier::LexicalClassifier,
    moderation_record_manager::ModerationRecordManager,
    normalizer,
    pii_detector::{self, PiiDetector},
};
use crate::error::ApplicationError;

/// Shown to authors of mildly unkind content
pub const KINDNESS_NOTICE: &str =
    "💬 Please keep it kind: some words in this text could hurt others.";

/// Policy knobs for the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationPolicy {
    /// Severity contributed by any detected personal information
    pub pii_severity: Severity,
    /// Persist a record for every evaluation
    pub audit_all: bool,
    /// Persist a record for every evaluation of these content types
    pub audit_content_types: Vec<ContentType>,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            pii_severity: Severity::Moderate,
            audit_all: false,
            audit_content_types: Vec::new(),
        }
    }
}

impl ModerationPolicy {
    /// Whether an evaluation with `action` on `content_type` gets a record
    pub fn requires_record(&self, action: ModerationAction, content_type: ContentType) -> bool {
        action.action().requires_record()
            || self.audit_all
            || self.audit_content_types.contains(&content_type)
    }
}

/// A user-authored write awaiting moderation
#[derive(Clone)]
pub struct ContentSubmission {
    /// Raw text as entered
    pub text: String,
    /// Kind of content
    pub content_type: ContentType,
    /// Opaque pointer back to the content in the caller's store
    pub content_ref: String,
    /// Author of the content
    pub author_id: UserId,
}

impl std::fmt::Debug for ContentSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSubmission")
            .field("text_len", &self.text.len())
            .field("content_type", &self.content_type)
            .field("content_ref", &self.content_ref)
            .field("author_id", &self.author_id)
            .finish()
    }
}

/// Outcome of running the pipeline over one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Combined lexical and PII severity
    pub severity: Severity,
    /// Action and notification flags
    pub decision: ModerationAction,
    /// Text to store when the action permits a write
    pub masked_text: String,
    /// Messages for the author
    pub warnings: Vec<String>,
    /// Lexical classifier output on the normalized text
    pub classification: ClassificationResult,
    /// PII detector output on the normalized text
    pub pii: PiiResult,
    /// Audit record, when one was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<ModerationId>,
}

impl Evaluation {
    /// Whether the caller must reject the write
    pub const fn rejects_write(&self) -> bool {
        self.decision.action().rejects_write()
    }
}

/// Moderation pipeline for user-authored content
pub struct ContentModerationService {
    classifier: Arc<LexicalClassifier>,
    pii: PiiDetector,
    records: Arc<ModerationRecordManager>,
    policy: ModerationPolicy,
}

impl std::fmt::Debug for ContentModerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentModerationService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ContentModerationService {
    /// Create a new moderation service
    pub fn new(
        classifier: Arc<LexicalClassifier>,
        pii: PiiDetector,
        records: Arc<ModerationRecordManager>,
        policy: ModerationPolicy,
    ) -> Self {
        Self {
            classifier,
            pii,
            records,
            policy,
        }
    }

    /// The active policy
    pub const fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Run the pure part of the pipeline without persisting anything
    pub fn assess(&self, text: &str) -> Evaluation {
        let normalized = normalizer::normalize(text);
        let pii = self.pii.detect(&normalized);
        let classification = self.classifier.classify(&normalized);

        let severity = if pii.detected {
            classification.severity.max(self.policy.pii_severity)
        } else {
            classification.severity
        };
        let decision = ModerationAction::decide(severity);

        let masked_text = if pii.detected {
            self.classifier.classify(&pii.masked).filtered_text
        } else {
            classification.filtered_text.clone()
        };

        let mut warnings = Vec::new();
        if pii.detected {
            warnings.push(pii_detector::generate_warning(&pii.types));
        }
        if classification.severity == Severity::Mild {
            warnings.push(KINDNESS_NOTICE.to_string());
        }

        Evaluation {
            severity,
            decision,
            masked_text,
            warnings,
            classification,
            pii,
            record_id: None,
        }
    }

    /// Evaluate a submission and write an audit record when required
    ///
    /// Fails closed: if the record cannot be written for content of severity
    /// `Severe` or above, the whole evaluation fails with `StoreUnavailable`
    /// and the caller must not accept the write.
    #[instrument(skip(self, submission), fields(content_type = %submission.content_type, author_id = %submission.author_id))]
    pub async fn evaluate(
        &self,
        submission: &ContentSubmission,
    ) -> Result<Evaluation, ApplicationError> {
        let mut evaluation = self.assess(&submission.text);
        let decision = evaluation.decision;

        info!(
            severity = %evaluation.severity,
            action = %decision.action(),
            notify_guardian = decision.notify_guardian(),
            notify_admin = decision.notify_admin(),
            flagged_terms = evaluation.classification.flagged_terms.len(),
            patterns = ?evaluation.classification.matched_patterns,
            pii = evaluation.pii.detected,
            "Content evaluated"
        );

        if !self
            .policy
            .requires_record(decision, submission.content_type)
        {
            return Ok(evaluation);
        }

        match self.records.create_record(&evaluation, submission).await {
            Ok(record) => {
                evaluation.record_id = Some(record.id);
                Ok(evaluation)
            },
            Err(e) if evaluation.severity >= Severity::Severe => {
                warn!(error = %e, severity = %evaluation.severity, "Audit record not written; rejecting");
                Err(match e {
                    ApplicationError::StoreUnavailable(msg) => ApplicationError::StoreUnavailable(msg),
                    other => ApplicationError::StoreUnavailable(other.to_string()),
                })
            },
            Err(e) => {
                warn!(error = %e, severity = %evaluation.severity, "Audit record not written");
                Ok(evaluation)
            },
        }
    }
}
