//! Value Objects - Immutable, identity-less domain primitives

mod content_type;
mod ids;

pub use content_type::ContentType;
pub use ids::{ModerationId, UserId};
