use std::collections::{BTreeSet, HashMap};

const EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '-'];

/// Whitespace tokens with leading/trailing punctuation trimmed.
pub(crate) fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(EDGE_PUNCTUATION))
        .filter(|token| !token.is_empty())
        .collect()
}

pub(crate) fn word_set(text: &str) -> BTreeSet<&str> {
    tokens(text).into_iter().collect()
}

pub(crate) fn ngrams<'a>(words: &[&'a str], n: usize) -> Vec<Vec<&'a str>> {
    if n == 0 || words.len() < n {
        return Vec::new();
    }
    words.windows(n).map(|window| window.to_vec()).collect()
}

pub(crate) fn ngram_set<'a>(words: &[&'a str], n: usize) -> BTreeSet<Vec<&'a str>> {
    ngrams(words, n).into_iter().collect()
}

/// Jaccard index; two empty sets count as identical.
pub(crate) fn jaccard<T: Ord>(left: &BTreeSet<T>, right: &BTreeSet<T>) -> f64 {
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let intersection = left.intersection(right).count() as f64;
    let union = left.union(right).count() as f64;
    intersection / union
}

pub(crate) fn overlap_ratio(source: &BTreeSet<&str>, target: &BTreeSet<&str>) -> f64 {
    if source.is_empty() {
        return 0.0;
    }
    source.intersection(target).count() as f64 / source.len() as f64
}

pub(crate) fn char_set(text: &str) -> BTreeSet<char> {
    text.chars().collect()
}

pub(crate) fn token_counts<'a>(words: &[&'a str]) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(*word).or_insert(0) += 1;
    }
    counts
}

/// `min/max` of two lengths; both zero counts as a perfect match.
pub(crate) fn length_ratio(left: usize, right: usize) -> f64 {
    match (left, right) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        (a, b) => a.min(b) as f64 / a.max(b) as f64,
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub(crate) const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

pub(crate) fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_trim_edge_punctuation() {
        assert_eq!(
            tokens("data. for testing, use -- synthetic!"),
            vec!["data", "for", "testing", "use", "synthetic"]
        );
    }

    #[test]
    fn jaccard_handles_empty_sets() {
        let empty: BTreeSet<&str> = BTreeSet::new();
        let some: BTreeSet<&str> = ["a"].into_iter().collect();
        assert_eq!(jaccard(&empty, &empty), 1.0);
        assert_eq!(jaccard(&empty, &some), 0.0);
    }

    #[test]
    fn ngrams_need_enough_words() {
        assert!(ngrams(&["one"], 2).is_empty());
        assert_eq!(ngrams(&["a", "b", "c"], 2).len(), 2);
    }

    #[test]
    fn stopword_table_is_sorted_for_binary_search() {
        let mut sorted = STOPWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOPWORDS);
        assert!(is_stopword("the"));
        assert!(!is_stopword("playwright"));
    }
}
