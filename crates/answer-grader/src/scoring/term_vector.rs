//! Per-call TF-IDF vector space.
//!
//! A space is fit from exactly the documents being compared and dropped with
//! the call; nothing about one evaluation's vocabulary leaks into the next.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::text::is_stopword;

fn term_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid term regex"))
}

/// Unigrams and bigrams over non-stopword terms.
fn analyze(document: &str) -> Vec<String> {
    let words: Vec<&str> = term_re()
        .find_iter(document)
        .map(|found| found.as_str())
        .filter(|word| !is_stopword(word))
        .collect();

    let mut terms: Vec<String> = words.iter().map(|word| word.to_string()).collect();
    terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

#[derive(Debug, Clone)]
pub struct TermVectorSpace {
    vocabulary: BTreeMap<String, usize>,
    vectors: Vec<Vec<f64>>,
}

impl TermVectorSpace {
    /// Fit smoothed idf weights and L2-normalized tf-idf rows.
    pub fn fit(documents: &[&str]) -> Self {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|doc| analyze(doc)).collect();

        let mut vocabulary = BTreeMap::new();
        for terms in &analyzed {
            for term in terms {
                let next = vocabulary.len();
                vocabulary.entry(term.clone()).or_insert(next);
            }
        }

        let width = vocabulary.len();
        let mut document_frequency = vec![0usize; width];
        let mut counts: Vec<Vec<f64>> = Vec::with_capacity(analyzed.len());
        for terms in &analyzed {
            let mut row = vec![0.0; width];
            for term in terms {
                if let Some(&index) = vocabulary.get(term) {
                    row[index] += 1.0;
                }
            }
            for (index, value) in row.iter().enumerate() {
                if *value > 0.0 {
                    document_frequency[index] += 1;
                }
            }
            counts.push(row);
        }

        let n = analyzed.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|row| {
                let weighted: Vec<f64> = row
                    .iter()
                    .zip(&idf)
                    .map(|(tf, weight)| tf * weight)
                    .collect();
                let norm = weighted.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    weighted.into_iter().map(|v| v / norm).collect()
                } else {
                    weighted
                }
            })
            .collect();

        Self {
            vocabulary,
            vectors,
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine of two fitted rows, floored at zero.
    pub fn cosine(&self, left: usize, right: usize) -> f64 {
        match (self.vectors.get(left), self.vectors.get(right)) {
            (Some(a), Some(b)) => {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                dot.clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

/// Fit a space from the two texts and compare them.
///
/// `None` when there is nothing to vectorize (both texts empty, or only
/// stopwords); `Some(0.0)` when exactly one text is empty.
pub fn pairwise_similarity(left: &str, right: &str) -> Option<f64> {
    match (left.trim().is_empty(), right.trim().is_empty()) {
        (true, true) => return None,
        (true, false) | (false, true) => return Some(0.0),
        (false, false) => {}
    }

    let space = TermVectorSpace::fit(&[left, right]);
    if space.vocabulary_len() == 0 {
        return None;
    }
    Some(space.cosine(0, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_are_fully_similar() {
        let text = "playwright waits for elements to be actionable";
        let similarity = pairwise_similarity(text, text).expect("vocabulary present");
        assert!((similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_documents_score_zero() {
        assert_eq!(pairwise_similarity("rust compiler", "banana bread"), Some(0.0));
    }

    #[test]
    fn empty_inputs_follow_contract() {
        assert_eq!(pairwise_similarity("", ""), None);
        assert_eq!(pairwise_similarity("", "something useful"), Some(0.0));
        assert_eq!(pairwise_similarity("it is", "to be"), None);
    }

    #[test]
    fn shared_terms_weigh_less_than_unique_ones() {
        let space = TermVectorSpace::fit(&["alpha beta", "alpha gamma"]);
        let similarity = space.cosine(0, 1);
        assert!(similarity > 0.0 && similarity < 0.5, "got {similarity}");
    }

    #[test]
    fn analyzer_builds_bigrams_after_stopword_removal() {
        let terms = analyze("the quick fox of the forest");
        assert!(terms.contains(&"quick fox".to_string()));
        assert!(terms.contains(&"fox forest".to_string()));
        assert!(!terms.iter().any(|term| term.contains("the")));
    }
}
