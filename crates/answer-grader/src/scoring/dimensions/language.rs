//! Dimensions backed by optional linguistic providers, plus readability.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::super::capabilities::{GrammarChecker, LanguageModel, NamedEntity, SentimentAnalyzer};
use super::super::domain::{Dimension, ScoringIssue};

const NEUTRAL_READABILITY: f64 = 50.0;
const NEUTRAL_CLARITY: f64 = 70.0;
const NEUTRAL_SENTIMENT: f64 = 50.0;
const NEUTRAL_ENTITY_AGREEMENT: f64 = 50.0;

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").expect("valid word regex"))
}

fn sentence_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid sentence regex"))
}

/// Vowel-group syllable estimate with a silent trailing `e`.
fn syllables(word: &str) -> usize {
    let lowered = word.to_ascii_lowercase();
    let mut count = 0;
    let mut previous_vowel = false;
    for ch in lowered.chars() {
        let vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    if lowered.ends_with('e') && !lowered.ends_with("le") && count > 1 {
        count -= 1;
    }
    count.max(1)
}

/// Flesch reading ease before clamping; `None` when no words are countable.
pub(crate) fn flesch_reading_ease(text: &str) -> Option<f64> {
    let words: Vec<&str> = word_re().find_iter(text).map(|found| found.as_str()).collect();
    if words.is_empty() {
        return None;
    }
    let sentences = sentence_end_re().find_iter(text).count().max(1) as f64;
    let word_count = words.len() as f64;
    let syllable_count: usize = words.iter().map(|word| syllables(word)).sum();

    let words_per_sentence = word_count / sentences;
    let syllables_per_word = syllable_count as f64 / word_count;
    Some(206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
}

pub(crate) fn readability(raw: &str) -> (f64, Option<f64>) {
    if raw.trim().is_empty() {
        return (0.0, None);
    }
    match flesch_reading_ease(raw) {
        Some(ease) => (ease.clamp(0.0, 100.0), Some(ease)),
        None => (NEUTRAL_READABILITY, None),
    }
}

/// Clarity score and grammar issue count.
pub(crate) fn clarity(
    raw: &str,
    checker: &dyn GrammarChecker,
    issues: &mut Vec<ScoringIssue>,
) -> (f64, usize) {
    if raw.trim().is_empty() {
        return (0.0, 0);
    }
    if !checker.is_available() {
        return (NEUTRAL_CLARITY, 0);
    }

    match checker.count_issues(raw) {
        Ok(errors) => {
            let words = raw.split_whitespace().count().max(1) as f64;
            let error_rate = errors as f64 / words;
            ((100.0 - (error_rate * 400.0).min(100.0)).max(0.0), errors)
        }
        Err(error) => {
            issues.push(ScoringIssue::new(Dimension::Clarity, error.to_string()));
            (NEUTRAL_CLARITY, 0)
        }
    }
}

/// Sentiment score and the raw compound polarity.
pub(crate) fn sentiment(
    raw: &str,
    analyzer: &dyn SentimentAnalyzer,
    issues: &mut Vec<ScoringIssue>,
) -> (f64, f64) {
    if raw.trim().is_empty() || !analyzer.is_available() {
        return (NEUTRAL_SENTIMENT, 0.0);
    }

    match analyzer.compound(raw) {
        Ok(compound) if compound.is_finite() => {
            let compound = compound.clamp(-1.0, 1.0);
            ((compound + 1.0) * 50.0, compound)
        }
        Ok(_) => {
            issues.push(ScoringIssue::new(
                Dimension::Sentiment,
                "analyzer returned a non-finite compound",
            ));
            (NEUTRAL_SENTIMENT, 0.0)
        }
        Err(error) => {
            issues.push(ScoringIssue::new(Dimension::Sentiment, error.to_string()));
            (NEUTRAL_SENTIMENT, 0.0)
        }
    }
}

/// F1 over exact `(text, label)` entity matches.
pub(crate) fn entity_agreement(
    candidate: &str,
    reference: &str,
    language: &dyn LanguageModel,
    issues: &mut Vec<ScoringIssue>,
) -> f64 {
    if !language.is_available() {
        return NEUTRAL_ENTITY_AGREEMENT;
    }

    let extract = |text: &str| -> Result<BTreeSet<NamedEntity>, String> {
        language
            .entities(text)
            .map(|entities| entities.into_iter().collect())
            .map_err(|error| error.to_string())
    };

    let (candidate_entities, reference_entities) = match (extract(candidate), extract(reference)) {
        (Ok(left), Ok(right)) => (left, right),
        (Err(detail), _) | (_, Err(detail)) => {
            issues.push(ScoringIssue::new(Dimension::EntityAgreement, detail));
            return NEUTRAL_ENTITY_AGREEMENT;
        }
    };

    if candidate_entities.is_empty() && reference_entities.is_empty() {
        return 100.0;
    }
    if candidate_entities.is_empty() || reference_entities.is_empty() {
        return 0.0;
    }

    let shared = candidate_entities.intersection(&reference_entities).count() as f64;
    let precision = shared / candidate_entities.len() as f64;
    let recall = shared / reference_entities.len() as f64;
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::capabilities::{
        CapabilityError, LexiconSentimentAnalyzer, NullGrammarChecker, NullLanguageModel,
        NullSentimentAnalyzer,
    };

    struct CountingChecker(Result<usize, CapabilityError>);

    impl GrammarChecker for CountingChecker {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn count_issues(&self, _text: &str) -> Result<usize, CapabilityError> {
            self.0.clone()
        }
    }

    struct CapitalizedEntities;

    impl LanguageModel for CapitalizedEntities {
        fn name(&self) -> &'static str {
            "capitalized"
        }

        fn similarity(&self, _left: &str, _right: &str) -> Result<f64, CapabilityError> {
            Ok(0.5)
        }

        fn entities(&self, text: &str) -> Result<Vec<NamedEntity>, CapabilityError> {
            Ok(text
                .split_whitespace()
                .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
                .map(|word| NamedEntity {
                    text: word.to_string(),
                    label: "PROPER".to_string(),
                })
                .collect())
        }
    }

    #[test]
    fn syllable_estimates_are_reasonable() {
        assert_eq!(syllables("cat"), 1);
        assert_eq!(syllables("table"), 2);
        assert_eq!(syllables("make"), 1);
        assert_eq!(syllables("regulations"), 4);
    }

    #[test]
    fn readability_handles_degenerate_text() {
        assert_eq!(readability("   ").0, 0.0);
        assert_eq!(readability("42 17").0, 50.0);
        let (simple, _) = readability("The cat sat on the mat.");
        assert!(simple > 90.0, "got {simple}");
    }

    #[test]
    fn clarity_defaults_without_checker() {
        let mut issues = Vec::new();
        assert_eq!(clarity("Some text", &NullGrammarChecker, &mut issues), (70.0, 0));
        assert!(issues.is_empty());
    }

    #[test]
    fn clarity_scales_with_error_rate() {
        let mut issues = Vec::new();
        let (score, errors) = clarity("one two three four", &CountingChecker(Ok(1)), &mut issues);
        assert_eq!(errors, 1);
        assert_eq!(score, 0.0);

        let failing = CountingChecker(Err(CapabilityError::Failed {
            provider: "counting",
            message: "timeout".to_string(),
        }));
        assert_eq!(clarity("text", &failing, &mut issues).0, 70.0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].dimension, Dimension::Clarity);
    }

    #[test]
    fn sentiment_maps_compound_to_percent() {
        let mut issues = Vec::new();
        assert_eq!(sentiment("great", &NullSentimentAnalyzer, &mut issues).0, 50.0);
        let lexicon = LexiconSentimentAnalyzer::default();
        let (score, compound) = sentiment("great work", &lexicon, &mut issues);
        assert!(compound > 0.0);
        assert!((score - (compound + 1.0) * 50.0).abs() < 1e-9);
    }

    #[test]
    fn entity_agreement_uses_exact_matches() {
        let mut issues = Vec::new();
        assert_eq!(entity_agreement("a", "b", &NullLanguageModel, &mut issues), 50.0);
        let model = CapitalizedEntities;
        assert_eq!(entity_agreement("lower", "case", &model, &mut issues), 100.0);
        let partial = entity_agreement("Paris and Rome", "Paris", &model, &mut issues);
        assert!((partial - 200.0 / 3.0).abs() < 1e-9, "got {partial}");
    }
}
