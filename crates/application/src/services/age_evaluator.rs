//! Age evaluator - maps content severity to age bands and simplifies wording
//! for younger readers

use std::sync::{Arc, LazyLock};

use domain::{AgeAppropriateness, Severity};
use serde::{Deserialize, Serialize};

use super::{
    lexical_classifier::LexicalClassifier, normalizer::normalize, word_substitution::WordSubstitution,
};
use crate::error::ApplicationError;

/// Formal connectives replaced by plainer words
const SIMPLIFY_TABLE: &[(&str, &str)] = &[
    ("međutim", "ali"),
    ("stoga", "zato"),
    ("ukoliko", "ako"),
    ("prilikom", "kada"),
    ("usled", "zbog"),
    ("s obzirom na to da", "pošto"),
    ("shodno tome", "zato"),
    ("naposletku", "na kraju"),
    ("neophodno", "potrebno"),
    ("isključivo", "samo"),
    ("iziskuje", "traži"),
];

static SIMPLIFIER: LazyLock<WordSubstitution> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Static table of escaped literals
    WordSubstitution::new(SIMPLIFY_TABLE).expect("Failed to build simplification table")
});

/// Age thresholds for authored content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgePolicy {
    /// Youngest age allowed to author content at all
    pub minimum_age: u8,
    /// Age from which any content severity is acceptable
    pub adult_age: u8,
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            minimum_age: 7,
            adult_age: 18,
        }
    }
}

impl AgePolicy {
    /// Check that the thresholds are ordered
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.minimum_age >= self.adult_age {
            return Err(ApplicationError::Configuration(format!(
                "minimum_age ({}) must be below adult_age ({})",
                self.minimum_age, self.adult_age
            )));
        }
        Ok(())
    }

    /// Verdict for content of `severity` authored at `age`
    pub const fn evaluate(&self, severity: Severity, age: u8) -> AgeAppropriateness {
        if age < self.minimum_age {
            return AgeAppropriateness::requires_age(self.minimum_age);
        }
        if age >= self.adult_age {
            return AgeAppropriateness::appropriate();
        }
        match severity {
            Severity::None | Severity::Mild => AgeAppropriateness::appropriate(),
            Severity::Moderate | Severity::Severe | Severity::Critical => {
                AgeAppropriateness::requires_age(self.adult_age)
            },
        }
    }
}

/// Evaluates texts against an age policy
#[derive(Debug, Clone)]
pub struct AgeEvaluator {
    classifier: Arc<LexicalClassifier>,
    policy: AgePolicy,
}

impl AgeEvaluator {
    /// Create an evaluator sharing a compiled classifier
    pub fn new(classifier: Arc<LexicalClassifier>, policy: AgePolicy) -> Result<Self, ApplicationError> {
        policy.validate()?;
        Ok(Self { classifier, policy })
    }

    /// The active policy
    pub const fn policy(&self) -> &AgePolicy {
        &self.policy
    }

    /// Normalize and classify `text`, then judge it for an author of `age`
    pub fn is_appropriate(&self, text: &str, age: u8) -> AgeAppropriateness {
        let severity = self.classifier.classify(&normalize(text)).severity;
        self.policy.evaluate(severity, age)
    }
}

/// Replace formal connectives with simpler ones
///
/// Matches whole words only, case-insensitively, keeping the case of the first letter.
#[must_use]
pub fn simplify(text: &str) -> String {
    SIMPLIFIER.apply(text)
}

#[cfg(test)]
mod tests {
    use domain::{TermEntry, Tier, TierTable};

    use super::*;

    fn evaluator() -> AgeEvaluator {
        let classifier = Arc::new(LexicalClassifier::with_default_table().unwrap());
        AgeEvaluator::new(classifier, AgePolicy::default()).unwrap()
    }

    #[test]
    fn below_minimum_age_is_never_appropriate() {
        let verdict = evaluator().is_appropriate("Zdravo drugari", 6);
        assert_eq!(verdict, AgeAppropriateness::requires_age(7));
    }

    #[test]
    fn adults_may_post_anything() {
        let verdict = evaluator().is_appropriate("Ovo je sranje", 18);
        assert_eq!(verdict, AgeAppropriateness::appropriate());
    }

    #[test]
    fn minors_and_moderate_content() {
        let e = evaluator();
        assert_eq!(
            e.is_appropriate("Ovo je sranje", 12),
            AgeAppropriateness::requires_age(18)
        );
        assert_eq!(e.is_appropriate("Ti si budala", 12), AgeAppropriateness::appropriate());
        assert_eq!(e.is_appropriate("Lep dan", 7), AgeAppropriateness::appropriate());
    }

    #[test]
    fn stretched_term_is_still_caught() {
        let table = TierTable {
            version: "test".to_string(),
            terms: vec![TermEntry {
                term: "asshole".to_string(),
                tier: Tier::Profanity,
            }],
            patterns: Vec::new(),
            exceptions: Vec::new(),
        };
        let classifier = Arc::new(LexicalClassifier::new(table).unwrap());
        let e = AgeEvaluator::new(classifier, AgePolicy::default()).unwrap();

        assert_eq!(
            e.is_appropriate("you assssshole", 12),
            AgeAppropriateness::requires_age(18)
        );
    }

    #[test]
    fn six_year_old_needs_minimum_age_even_for_clean_text() {
        let verdict = evaluator().is_appropriate("Volim školu", 6);
        assert!(!verdict.appropriate);
        assert_eq!(verdict.suggested_age, Some(7));
    }

    #[test]
    fn policy_table() {
        let policy = AgePolicy::default();
        assert!(policy.evaluate(Severity::Critical, 17).suggested_age == Some(18));
        assert!(policy.evaluate(Severity::Critical, 30).appropriate);
        assert!(policy.evaluate(Severity::None, 0).suggested_age == Some(7));
    }

    #[test]
    fn inverted_policy_rejected() {
        let policy = AgePolicy {
            minimum_age: 18,
            adult_age: 7,
        };
        assert!(matches!(
            policy.validate(),
            Err(ApplicationError::Configuration(_))
        ));
    }

    #[test]
    fn simplify_replaces_connectives() {
        assert_eq!(
            simplify("Međutim, ukoliko padne kiša, ostajemo kod kuće."),
            "Ali, ako padne kiša, ostajemo kod kuće."
        );
    }

    #[test]
    fn simplify_multiword_phrase() {
        assert_eq!(
            simplify("S obzirom na to da kasniš, idemo bez tebe"),
            "Pošto kasniš, idemo bez tebe"
        );
    }

    #[test]
    fn simplify_leaves_other_words_alone() {
        assert_eq!(simplify("Stogodišnjak"), "Stogodišnjak");
    }
}
