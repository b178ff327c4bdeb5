//! Domain layer for the content safety pipeline
//!
//! Contains the moderation vocabulary: severities, classifier results,
//! moderation actions, moderation records and the tier table.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
