//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod moderation_record_store;

#[cfg(test)]
pub use moderation_record_store::MockModerationRecordStore;
pub use moderation_record_store::{ModerationRecordStore, Page, RecordFilter, ReviewUpdate};
