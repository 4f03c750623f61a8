use std::sync::OnceLock;

use regex::Regex;

use super::super::text::{is_stopword, token_counts, tokens, word_set};

/// Band table over the candidate/reference word ratio.
pub(crate) fn length_adequacy(candidate_words: usize, reference_words: usize) -> f64 {
    if reference_words == 0 {
        return 80.0;
    }
    let ratio = candidate_words as f64 / reference_words as f64;
    match ratio {
        r if r < 0.3 => 20.0,
        r if r < 0.5 => 40.0,
        r if r < 0.8 => 70.0,
        r if r <= 1.5 => 100.0,
        r if r <= 2.0 => 85.0,
        r if r <= 3.0 => 70.0,
        _ => 50.0,
    }
}

const STEPWISE_CUES: &[&str] = &[
    "steps",
    "step by step",
    "how do you",
    "how to",
    "list",
    "procedure",
    "process",
    "walk me through",
    "instructions",
];

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:\d+[.)]|[-*•])\s+\S").expect("valid list marker regex")
    })
}

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:first(?:ly)?|second(?:ly)?|third(?:ly)?|then|next|finally|step \d+)\b")
            .expect("valid ordinal regex")
    })
}

/// Sub-metrics of the structural quality dimension, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StructureBreakdown {
    pub lexical_diversity: f64,
    pub repetition: f64,
    pub formatting: f64,
}

impl StructureBreakdown {
    /// `normalized` drives the token metrics; `raw` keeps line breaks for list markers.
    pub fn compute(question_lowered: &str, normalized: &str, raw: &str) -> Self {
        let words = tokens(normalized);
        let lexical_diversity = if words.is_empty() {
            0.0
        } else {
            word_set(normalized).len() as f64 / words.len() as f64 * 100.0
        };

        let repetition = if words.is_empty() {
            100.0
        } else {
            let excess: usize = token_counts(&words)
                .into_iter()
                .filter(|(word, _)| !is_stopword(word))
                .map(|(_, count)| count.saturating_sub(2))
                .sum();
            (100.0 - excess as f64 / words.len() as f64 * 100.0).max(0.0)
        };

        let stepwise = STEPWISE_CUES
            .iter()
            .any(|cue| question_lowered.contains(*cue));
        let formatting = if !stepwise {
            60.0
        } else if list_marker_re().is_match(raw) || ordinal_re().is_match(raw) {
            80.0
        } else {
            20.0
        };

        Self {
            lexical_diversity,
            repetition,
            formatting,
        }
    }

    pub fn score(&self) -> f64 {
        (self.lexical_diversity + self.repetition + self.formatting) / 3.0
    }
}
