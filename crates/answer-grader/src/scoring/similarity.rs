use std::collections::BTreeMap;

use super::capabilities::LanguageModel;
use super::domain::SimilarityMethod;
use super::term_vector::pairwise_similarity;
use super::text::{char_set, jaccard, length_ratio, mean, ngram_set, tokens, word_set};

/// Method estimates that produced a value, in [0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodScores {
    scores: BTreeMap<SimilarityMethod, f64>,
}

impl MethodScores {
    fn record(&mut self, method: SimilarityMethod, score: Option<f64>) {
        if let Some(score) = score.filter(|value| value.is_finite()) {
            self.scores.insert(method, score.clamp(0.0, 1.0));
        }
    }

    pub fn get(&self, method: SimilarityMethod) -> Option<f64> {
        self.scores.get(&method).copied()
    }

    pub fn methods(&self) -> impl Iterator<Item = SimilarityMethod> + '_ {
        self.scores.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean over the methods present; absent methods are not zeros.
    pub fn unified(&self) -> f64 {
        let values: Vec<f64> = self.scores.values().copied().collect();
        mean(&values).unwrap_or(0.0).clamp(0.0, 1.0)
    }

    pub fn to_named_map(&self) -> BTreeMap<String, f64> {
        self.scores
            .iter()
            .map(|(method, score)| (method.as_str().to_string(), *score))
            .collect()
    }
}

/// Independent estimates averaged into the unified similarity.
pub struct SimilarityEnsemble<'a> {
    language: &'a dyn LanguageModel,
}

impl<'a> SimilarityEnsemble<'a> {
    pub fn new(language: &'a dyn LanguageModel) -> Self {
        Self { language }
    }

    pub fn score(&self, candidate: &str, reference: &str) -> MethodScores {
        let mut scores = MethodScores::default();
        scores.record(SimilarityMethod::Tfidf, pairwise_similarity(candidate, reference));
        scores.record(
            SimilarityMethod::WordVectors,
            word_vector_similarity(self.language, candidate, reference),
        );
        scores.record(
            SimilarityMethod::Custom,
            Some(custom_similarity(candidate, reference)),
        );
        scores
    }
}

/// Native document similarity of the optional model, floored at zero.
pub(crate) fn word_vector_similarity(
    language: &dyn LanguageModel,
    left: &str,
    right: &str,
) -> Option<f64> {
    if !language.is_available() {
        return None;
    }
    match language.similarity(left, right) {
        Ok(value) => Some(value.max(0.0)),
        Err(error) => {
            tracing::warn!(%error, "word-vector similarity unavailable for this call");
            None
        }
    }
}

/// Sub-terms of the custom composite, exposed for the metrics map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeBreakdown {
    pub word_jaccard: f64,
    pub bigram_jaccard: Option<f64>,
    pub trigram_jaccard: Option<f64>,
    pub char_jaccard: f64,
    pub length_ratio: f64,
}

impl CompositeBreakdown {
    pub fn compute(candidate: &str, reference: &str) -> Self {
        let (candidate_empty, reference_empty) = (candidate.is_empty(), reference.is_empty());
        let edge = match (candidate_empty, reference_empty) {
            (true, true) => Some(1.0),
            (true, false) | (false, true) => Some(0.0),
            (false, false) => None,
        };
        if let Some(value) = edge {
            return Self {
                word_jaccard: value,
                bigram_jaccard: Some(value),
                trigram_jaccard: Some(value),
                char_jaccard: value,
                length_ratio: value,
            };
        }

        let candidate_words = tokens(candidate);
        let reference_words = tokens(reference);

        let ngram_term = |n: usize| {
            let left = ngram_set(&candidate_words, n);
            let right = ngram_set(&reference_words, n);
            if left.is_empty() && right.is_empty() {
                None
            } else {
                Some(jaccard(&left, &right))
            }
        };

        Self {
            word_jaccard: jaccard(&word_set(candidate), &word_set(reference)),
            bigram_jaccard: ngram_term(2),
            trigram_jaccard: ngram_term(3),
            char_jaccard: jaccard(&char_set(candidate), &char_set(reference)),
            length_ratio: length_ratio(candidate.chars().count(), reference.chars().count()),
        }
    }

    pub fn composite(&self) -> f64 {
        let mut terms = vec![self.word_jaccard, self.char_jaccard, self.length_ratio];
        terms.extend(self.bigram_jaccard);
        terms.extend(self.trigram_jaccard);
        mean(&terms).unwrap_or(0.0)
    }
}

pub(crate) fn custom_similarity(candidate: &str, reference: &str) -> f64 {
    CompositeBreakdown::compute(candidate, reference).composite()
}
