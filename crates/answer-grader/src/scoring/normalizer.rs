//! Text canonicalization shared by every scorer.
//!
//! Normalization runs in a fixed order: lowercase, collapse whitespace, strip
//! characters outside the punctuation allow-list, drop filler words, then
//! rewrite refusal phrasings to [`REFUSAL_TOKEN`]. The intermediate
//! [`NormalizedText::lowered`] form keeps punctuation for detectors that need
//! apostrophes or list markers.

use std::sync::OnceLock;

use regex::Regex;

/// Canonical stand-in for every recognized refusal phrasing.
pub const REFUSAL_TOKEN: &str = "refusal_marker";

const FILLER_PATTERN: &str = r"\b(?:um|uh|like|you know|actually|basically)\b";

// Matched after apostrophes are stripped, so "can't" arrives as "cant".
const REFUSAL_SURFACE_PATTERN: &str = r"\b(?:i cannot|i can not|i cant|i wont|i will not|i am not able|im not able|i am unable|im unable|i must decline|i have to decline|against my guidelines|against my policies|against my policy|i am not comfortable|im not comfortable)\b";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,!?;:%\-]").expect("valid allow-list regex"))
}

fn filler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FILLER_PATTERN).expect("valid filler regex"))
}

fn refusal_surface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REFUSAL_SURFACE_PATTERN).expect("valid refusal regex"))
}

fn collapse_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Lowercased, whitespace-collapsed text with punctuation intact.
pub fn lowered(raw: &str) -> String {
    collapse_whitespace(&raw.to_lowercase())
}

/// Full canonical form used for lexical comparison.
pub fn normalize(raw: &str) -> String {
    let lowered = lowered(raw);
    let stripped = disallowed_re().replace_all(&lowered, "");
    let without_filler = filler_re().replace_all(&stripped, "");
    let canonical = refusal_surface_re().replace_all(&without_filler, REFUSAL_TOKEN);
    collapse_whitespace(&canonical)
}

/// Both normalization stages of one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub raw: String,
    pub lowered: String,
    pub normalized: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            lowered: lowered(raw),
            normalized: normalize(raw),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Hello\n\tWORLD  "), "hello world");
    }

    #[test]
    fn strips_characters_outside_allow_list() {
        assert_eq!(
            normalize("Costs $5 (approx.) — 20% off! #deal"),
            "costs 5 approx. 20% off! deal"
        );
    }

    #[test]
    fn removes_filler_words_without_touching_longer_words() {
        assert_eq!(
            normalize("Um, it is basically likely that you know the answer"),
            ", it is likely that the answer"
        );
    }

    #[test]
    fn canonicalizes_refusal_phrasings() {
        let variants = [
            "I cannot help with that.",
            "I can't help with that.",
            "I won't help with that.",
            "I am not able to help with that.",
            "I must decline to help with that.",
        ];
        for variant in variants {
            let normalized = normalize(variant);
            assert!(
                normalized.starts_with(REFUSAL_TOKEN),
                "{variant} normalized to {normalized}"
            );
        }
        assert!(normalize("That is against my guidelines").contains(REFUSAL_TOKEN));
    }

    #[test]
    fn lowered_form_keeps_apostrophes() {
        let text = NormalizedText::new("I Can't   do THAT");
        assert_eq!(text.lowered, "i can't do that");
        assert_eq!(text.normalized, "refusal_marker do that");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(NormalizedText::new("   ").is_empty());
        assert!(NormalizedText::new("#@$").is_empty());
    }
}
