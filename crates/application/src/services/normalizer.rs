//! Text normalizer - canonicalizes user input before classification
//!
//! Collapses exaggerated character runs ("glupppp!!!!") so that word-list
//! matching is not defeated by stretching a word. Digits and whitespace are
//! never collapsed; phone numbers and IDs depend on them.

use std::sync::LazyLock;

use super::word_substitution::WordSubstitution;

/// Longest run of one repeated character kept by [`normalize`]
pub const MAX_REPEAT: usize = 2;

/// Chat shorthand and missing-diacritic spellings
const AUTOCORRECT_TABLE: &[(&str, &str)] = &[
    ("nzm", "ne znam"),
    ("nmg", "ne mogu"),
    ("msm", "mislim"),
    ("bzvz", "bezveze"),
    ("zasto", "zašto"),
    ("sta", "šta"),
    ("vazi", "važi"),
    ("cao", "ćao"),
    ("pozz", "pozdrav"),
];

static AUTOCORRECT: LazyLock<WordSubstitution> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Static table of escaped literals
    WordSubstitution::new(AUTOCORRECT_TABLE).expect("Failed to build autocorrect table")
});

/// Trim `text` and collapse runs of more than [`MAX_REPEAT`] identical
/// letters or sentence punctuation (`!`, `?`, `.`)
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut previous = None;
    let mut run = 0usize;

    for c in trimmed.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run > MAX_REPEAT && is_collapsible(c) {
            continue;
        }
        out.push(c);
    }

    out
}

/// Expand common chat shorthand to full words
#[must_use]
pub fn autocorrect(text: &str) -> String {
    AUTOCORRECT.apply(text)
}

fn is_collapsible(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '!' | '?' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_stretched_letters() {
        assert_eq!(normalize("glupppppp"), "glupp");
        assert_eq!(normalize("ZDRAAAAVO"), "ZDRAAVO");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(normalize("stvarno?!?!!!!"), "stvarno?!?!!");
        assert_eq!(normalize("hmm....."), "hmm..");
    }

    #[test]
    fn keeps_digits_and_inner_whitespace() {
        assert_eq!(normalize("broj 0611112222"), "broj 0611112222");
        assert_eq!(normalize("a    b"), "a    b");
    }

    #[test]
    fn trims_outer_whitespace() {
        assert_eq!(normalize("  zdravo \n"), "zdravo");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn stretched_greeting_and_shouting() {
        assert_eq!(normalize("heeeeej"), "heej");
        assert_eq!(normalize("Šta!!!!!"), "Šta!!");
        assert_eq!(normalize("  tekst  "), "tekst");
    }

    #[test]
    fn collapses_non_ascii_letters() {
        assert_eq!(normalize("ššššta"), "ššta");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize("  jaoooo!!!! 111   ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn autocorrect_expands_shorthand() {
        assert_eq!(autocorrect("nzm sta da radim"), "ne znam šta da radim");
        assert_eq!(autocorrect("Zasto?"), "Zašto?");
    }

    #[test]
    fn autocorrect_ignores_word_fragments() {
        assert_eq!(autocorrect("stanica"), "stanica");
    }
}
