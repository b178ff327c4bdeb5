//! Application-level errors

use domain::{ModerationId, ModerationStatus};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Malformed tier table or settings; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown record or resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Review attempted on a record that already left the pending state
    #[error("Moderation record {id} already reviewed with status: {status}")]
    AlreadyReviewed {
        id: ModerationId,
        status: ModerationStatus,
    },

    /// Record store backend unreachable
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Caller lacks the privilege for this operation
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Check if this error should be surfaced to the caller as a conflict
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyReviewed { .. })
    }
}
