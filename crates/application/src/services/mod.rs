//! Application services - Use case implementations

mod age_evaluator;
mod content_moderation_service;
mod lexical_classifier;
mod moderation_record_manager;
pub mod normalizer;
mod pii_detector;
mod word_substitution;

pub use age_evaluator::{AgeEvaluator, AgePolicy, simplify};
pub use content_moderation_service::{
    ContentModerationService, ContentSubmission, Evaluation, KINDNESS_NOTICE, ModerationPolicy,
};
pub use lexical_classifier::{LexicalClassifier, MASK, builtin_tier_table};
pub use moderation_record_manager::ModerationRecordManager;
pub use normalizer::{autocorrect, normalize};
pub use pii_detector::{PiiDetector, generate_warning};
pub use word_substitution::WordSubstitution;
