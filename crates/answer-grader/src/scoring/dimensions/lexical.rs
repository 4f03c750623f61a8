use std::collections::BTreeMap;

use serde::Serialize;

use super::super::capabilities::LanguageModel;
use super::super::similarity::{word_vector_similarity, CompositeBreakdown};
use super::super::term_vector::pairwise_similarity;
use super::super::text::{mean, ngrams, overlap_ratio, tokens, word_set};

/// Word-level overlap figures behind the accuracy dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct AccuracyBreakdown {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub bleu: f64,
}

impl AccuracyBreakdown {
    pub fn compute(candidate: &str, reference: &str) -> Option<Self> {
        if candidate.is_empty() || reference.is_empty() {
            return None;
        }

        let candidate_words = word_set(candidate);
        let reference_words = word_set(reference);
        let shared = candidate_words.intersection(&reference_words).count() as f64;
        let precision = shared / candidate_words.len().max(1) as f64;
        let recall = shared / reference_words.len().max(1) as f64;
        let f1 = 2.0 * precision * recall / (precision + recall).max(0.001);

        Some(Self {
            precision,
            recall,
            f1,
            bleu: ngram_precision(candidate, reference),
        })
    }

    pub fn score(&self) -> f64 {
        (self.precision + self.recall + self.f1 + self.bleu) / 4.0 * 100.0
    }
}

/// Mean of 1-gram and 2-gram precision of the candidate against the reference.
fn ngram_precision(candidate: &str, reference: &str) -> f64 {
    let candidate_words = tokens(candidate);
    let reference_words = tokens(reference);
    if candidate_words.is_empty() || reference_words.is_empty() {
        return 0.0;
    }

    let mut precisions = Vec::with_capacity(2);
    for n in [1, 2] {
        let candidate_ngrams = ngrams(&candidate_words, n);
        if candidate_ngrams.is_empty() {
            continue;
        }
        let reference_ngrams = ngrams(&reference_words, n);
        let matches = candidate_ngrams
            .iter()
            .filter(|gram| reference_ngrams.contains(gram))
            .count();
        precisions.push(matches as f64 / candidate_ngrams.len() as f64);
    }
    mean(&precisions).unwrap_or(0.0)
}

/// Two sides without any word tokens count as an exact match.
pub(crate) fn accuracy(candidate: &str, reference: &str) -> (f64, Option<AccuracyBreakdown>) {
    if tokens(candidate).is_empty() && tokens(reference).is_empty() {
        return (100.0, None);
    }
    match AccuracyBreakdown::compute(candidate, reference) {
        Some(breakdown) => (breakdown.score(), Some(breakdown)),
        None => (0.0, None),
    }
}

const LENGTH_RATIO_CAP: f64 = 2.0;

/// Character-length ratio capped at 2x and rescaled to [0, 1]; saturates at
/// twice the reference length.
fn length_term(candidate: &str, reference: &str) -> f64 {
    let reference_len = reference.chars().count().max(1) as f64;
    (candidate.chars().count() as f64 / reference_len).min(LENGTH_RATIO_CAP) / LENGTH_RATIO_CAP
}

pub(crate) fn completeness(candidate: &str, reference: &str, question: &str) -> f64 {
    if reference.is_empty() {
        return if candidate.is_empty() { 100.0 } else { 50.0 };
    }

    let candidate_words = word_set(candidate);
    let concept_coverage = overlap_ratio(&word_set(reference), &candidate_words);
    let question_coverage = overlap_ratio(&word_set(question), &candidate_words);

    let length_term = length_term(candidate, reference);

    let candidate_tokens = tokens(candidate);
    let unique_ratio = candidate_words.len() as f64 / candidate_tokens.len().max(1) as f64;

    let completeness = (concept_coverage * 0.4
        + question_coverage * 0.2
        + length_term * 0.2
        + unique_ratio * 0.2)
        * 100.0;
    completeness.min(100.0)
}

pub(crate) fn relevance(question: &str, candidate: &str, language: &dyn LanguageModel) -> f64 {
    if question.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let mut signals = Vec::with_capacity(3);
    let question_words = word_set(question);
    if !question_words.is_empty() {
        signals.push(overlap_ratio(&question_words, &word_set(candidate)));
    }
    signals.extend(pairwise_similarity(question, candidate));
    signals.extend(word_vector_similarity(language, question, candidate));

    mean(&signals).map(|value| value * 100.0).unwrap_or(50.0)
}

const SAFETY_CUES: &[&str] = &["danger", "illegal", "harm"];
const CREATIVE_CUES: &[&str] = &["story", "poem", "creative"];
const TECHNICAL_CUES: &[&str] = &["algorithm", "complexity", "code", "api"];

/// Normalized pseudo-probabilities over the four intent labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct IntentEstimate {
    pub qa: f64,
    pub safety: f64,
    pub creative: f64,
    pub technical: f64,
}

impl IntentEstimate {
    pub fn estimate(question: &str, candidate: &str) -> Self {
        let question_words = word_set(question);
        let answer_words = word_set(candidate);
        let mentions = |cues: &[&str]| cues.iter().any(|cue| answer_words.contains(*cue));

        let qa = if question_words.is_empty() {
            0.0
        } else {
            overlap_ratio(&question_words, &answer_words)
        };
        let safety = if mentions(SAFETY_CUES) { 0.1 } else { 0.0 };
        let creative = if mentions(CREATIVE_CUES) { 0.2 } else { 0.0 };
        let technical = if mentions(TECHNICAL_CUES) { 0.2 } else { 0.0 };

        let total = qa + safety + creative + technical;
        let total = if total > 0.0 { total } else { 1.0 };
        Self {
            qa: qa / total,
            safety: safety / total,
            creative: creative / total,
            technical: technical / total,
        }
    }

    pub fn match_score(&self) -> f64 {
        self.qa * 100.0
    }
}

/// Snippet of a source text the candidate was checked against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RetrievalHit {
    pub source: &'static str,
    pub title: &'static str,
    pub snippet: String,
    pub score: f64,
}

const SNIPPET_CHARS: usize = 160;

pub(crate) fn factual_consistency(
    candidate: &str,
    reference: &str,
    question: &str,
) -> (f64, Vec<RetrievalHit>) {
    let sources = [
        ("reference", "Ground Truth", reference),
        ("question", "Prompt", question),
    ];

    let mut hits = Vec::new();
    for (source, title, text) in sources {
        if let Some(score) = pairwise_similarity(candidate, text) {
            hits.push(RetrievalHit {
                source,
                title,
                snippet: text.chars().take(SNIPPET_CHARS).collect(),
                score,
            });
        }
    }

    let values: Vec<f64> = hits.iter().map(|hit| hit.score).collect();
    let score = mean(&values).map(|value| value * 100.0).unwrap_or(50.0);
    (score, hits)
}

/// Overlap ratios reported alongside the dimensions.
pub(crate) fn overlap_metrics(candidate: &str, reference: &str) -> BTreeMap<&'static str, f64> {
    let breakdown = CompositeBreakdown::compute(candidate, reference);
    let mut metrics = BTreeMap::new();
    metrics.insert("jaccard", breakdown.word_jaccard);
    metrics.insert("ngram_overlap", breakdown.bigram_jaccard.unwrap_or(0.0));
    metrics.insert("char_overlap", breakdown.char_jaccard);
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::capabilities::NullLanguageModel;

    #[test]
    fn identical_answers_are_fully_accurate() {
        let (score, breakdown) = accuracy("tests should be isolated", "tests should be isolated");
        assert!((score - 100.0).abs() < 1e-9);
        assert_eq!(breakdown.map(|b| b.bleu), Some(1.0));
    }

    #[test]
    fn empty_side_zeroes_accuracy() {
        assert_eq!(accuracy("", "reference").0, 0.0);
        assert_eq!(accuracy("candidate", "").0, 0.0);
    }

    #[test]
    fn both_sides_empty_is_exact_match() {
        assert_eq!(accuracy("", ""), (100.0, None));
        assert_eq!(accuracy(".", "!"), (100.0, None));
    }

    #[test]
    fn completeness_edge_cases() {
        assert_eq!(completeness("", "", "q"), 100.0);
        assert_eq!(completeness("anything", "", "q"), 50.0);
        // concept 1.0, question 0.5, length 0.5, diversity 1.0
        let full = completeness("use synthetic data", "use synthetic data", "what data");
        assert!((full - 80.0).abs() < 1e-9, "got {full}");
    }

    #[test]
    fn length_term_saturates_at_twice_the_reference() {
        assert_eq!(length_term("", "abcd"), 0.0);
        assert_eq!(length_term("abcd", "abcd"), 0.5);
        assert_eq!(length_term("abcdefgh", "abcd"), 1.0);
        assert_eq!(length_term("abcdefghijklmnop", "abcd"), 1.0);
    }

    #[test]
    fn doubled_answer_is_more_complete_than_exact_length() {
        let reference = "alpha beta";
        let exact = completeness("alpha beta", reference, "");
        let doubled = completeness("alpha beta gamma delta", reference, "");
        assert!(doubled > exact, "doubled {doubled} exact {exact}");
    }

    #[test]
    fn relevance_falls_to_zero_without_text() {
        assert_eq!(relevance("", "answer", &NullLanguageModel), 0.0);
        let score = relevance("what is rust", "rust is a language", &NullLanguageModel);
        assert!(score > 0.0 && score <= 100.0);
    }

    #[test]
    fn intent_probabilities_are_normalized() {
        let intent = IntentEstimate::estimate("explain the algorithm", "the algorithm is simple code");
        let total = intent.qa + intent.safety + intent.creative + intent.technical;
        assert!((total - 1.0).abs() < 1e-9);
        assert!(intent.technical > 0.0);
        assert_eq!(IntentEstimate::estimate("why", "because").match_score(), 0.0);
    }

    #[test]
    fn factual_consistency_defaults_without_vocabulary() {
        let (score, hits) = factual_consistency("", "", "");
        assert_eq!(score, 50.0);
        assert!(hits.is_empty());
    }
}
