//! Application layer - Content safety pipeline and review workflow
//!
//! Contains the classification services, the moderation record manager and
//! the port definitions the infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
