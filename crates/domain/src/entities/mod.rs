//! Domain entities - Objects with identity and lifecycle, and pipeline results

mod content_safety;
mod moderation_record;
mod tier_table;

pub use content_safety::{
    ActionKind, AgeAppropriateness, ClassificationResult, ModerationAction, PiiFinding, PiiKind,
    PiiResult, Severity, Tier,
};
pub use moderation_record::{
    ModerationRecord, ModerationStatus, ReviewError, Reviewer, ReviewerRole,
};
pub use tier_table::{ContextException, PatternEntry, TermEntry, TierTable};
