//! Property-based tests for the classification pipeline
//!
//! These tests use proptest to verify invariants across many random inputs.

use application::{LexicalClassifier, PiiDetector, normalize};
use domain::{Severity, Tier};
use proptest::prelude::*;

fn classifier() -> LexicalClassifier {
    LexicalClassifier::with_default_table().unwrap()
}

/// Terms of the built-in table for a given tier
fn builtin_terms(tier: Tier) -> Vec<String> {
    application::builtin_tier_table()
        .unwrap()
        .validated()
        .unwrap()
        .terms_in(tier)
        .map(|t| t.term.clone())
        .collect()
}

fn critical_term() -> impl Strategy<Value = String> {
    let terms: Vec<String> = [
        Tier::Discriminatory,
        Tier::Violence,
        Tier::SexualOrSubstance,
    ]
    .iter()
    .flat_map(|t| builtin_terms(*t))
    .collect();
    prop::sample::select(terms)
}

/// Qualifiers from the built-in exception list, plus none
fn qualifier() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", " za vodu", " i viljuš", "ualno vaspitanje"])
}

/// Upper-case the characters of `term` selected by a repeating mask
fn mixed_case(term: &str, mask: &[bool]) -> String {
    term.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_uppercase().collect()
            } else {
                c.to_string()
            }
        })
        .collect()
}

fn any_term() -> impl Strategy<Value = String> {
    let terms: Vec<String> = Tier::all().iter().flat_map(|t| builtin_terms(*t)).collect();
    prop::sample::select(terms)
}

// ============================================================================
// Normalizer Property Tests
// ============================================================================

mod normalizer_tests {
    use super::*;

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "\\PC{0,80}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_never_grows(text in "\\PC{0,80}") {
            prop_assert!(normalize(&text).len() <= text.len());
        }

        #[test]
        fn normalize_keeps_every_digit(digits in "[0-9]{1,20}") {
            prop_assert_eq!(normalize(&digits), digits);
        }
    }
}

// ============================================================================
// Lexical Classifier Property Tests
// ============================================================================

mod classifier_tests {
    use super::*;

    proptest! {
        #[test]
        fn filtered_text_never_contains_flagged_terms(
            prefix in "[a-zA-Z ]{0,20}",
            term in any_term(),
            mask in prop::collection::vec(any::<bool>(), 1..6),
            context in qualifier(),
            repeat in any::<bool>(),
            suffix in "[a-zA-Z ]{0,20}",
        ) {
            let spelled = mixed_case(&term, &mask);
            let mut text = format!("{prefix}{spelled}{context}");
            if repeat {
                text.push(' ');
                text.push_str(&term.to_uppercase());
            }
            text.push_str(&suffix);

            let result = classifier().classify(&text);
            let filtered = result.filtered_text.to_lowercase();
            for flagged in &result.flagged_terms {
                prop_assert!(
                    !filtered.contains(&flagged.to_lowercase()),
                    "{flagged:?} survived in {:?}",
                    result.filtered_text
                );
            }
        }

        #[test]
        fn critical_terms_yield_critical(
            prefix in "[a-z ]{0,15}",
            term in critical_term(),
        ) {
            // A trailing space keeps context exceptions from applying.
            let text = format!("{prefix}{term} ");
            let result = classifier().classify(&text);
            prop_assert_eq!(result.severity, Severity::Critical);
            prop_assert!(!result.safe);
        }

        #[test]
        fn safe_iff_severity_none(text in "[a-zA-Zčćšžđ !?.]{0,60}") {
            let result = classifier().classify(&text);
            prop_assert_eq!(result.safe, result.severity == Severity::None);
            if result.safe {
                prop_assert_eq!(&result.filtered_text, &text);
            }
        }
    }
}

// ============================================================================
// PII Detector Property Tests
// ============================================================================

mod pii_tests {
    use super::*;

    proptest! {
        #[test]
        fn masked_text_hides_every_phone(
            prefix in "[a-z ]{0,10}",
            operator in 0u8..10,
            rest in "[0-9]{7}",
        ) {
            let phone = format!("06{operator}{rest}");
            let text = format!("{prefix} {phone} kraj");
            let result = PiiDetector::new().unwrap().detect(&text);
            prop_assert!(result.detected);
            prop_assert!(!result.masked.contains(&phone));
        }

        #[test]
        fn types_are_unique(text in "[a-z0-9@. ]{0,60}") {
            let result = PiiDetector::new().unwrap().detect(&text);
            let mut types = result.types.clone();
            types.dedup();
            prop_assert_eq!(types.len(), result.types.len());
            prop_assert_eq!(result.detected, !result.types.is_empty());
        }
    }
}
