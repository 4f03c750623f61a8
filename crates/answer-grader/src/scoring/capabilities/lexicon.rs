use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{CapabilityError, SentimentAnalyzer};

// VADER-style normalization constant for the compound score.
const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCREMENT: f64 = 0.293;

const VALENCES: &[(&str, f64)] = &[
    ("abuse", -3.2),
    ("accurate", 1.6),
    ("amazing", 2.8),
    ("angry", -2.3),
    ("annoying", -1.7),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("benefit", 2.0),
    ("best", 3.2),
    ("better", 1.9),
    ("broken", -1.8),
    ("careful", 1.3),
    ("clear", 1.6),
    ("confusing", -1.3),
    ("correct", 1.6),
    ("damage", -2.2),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("delighted", 3.0),
    ("disaster", -3.1),
    ("easy", 1.9),
    ("effective", 2.1),
    ("error", -1.7),
    ("excellent", 2.7),
    ("fail", -2.5),
    ("failure", -2.3),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("flaky", -1.2),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("harm", -2.5),
    ("harmful", -2.6),
    ("hate", -2.7),
    ("helpful", 1.9),
    ("hope", 1.9),
    ("horrible", -2.5),
    ("illegal", -2.6),
    ("improve", 1.9),
    ("love", 3.2),
    ("nice", 1.8),
    ("pain", -2.3),
    ("perfect", 2.7),
    ("poor", -2.1),
    ("problem", -1.7),
    ("reliable", 1.9),
    ("robust", 1.6),
    ("sad", -2.1),
    ("safe", 1.9),
    ("secure", 1.4),
    ("sorry", -0.3),
    ("stable", 1.2),
    ("success", 2.7),
    ("terrible", -2.1),
    ("thanks", 1.9),
    ("ugly", -2.3),
    ("unfortunately", -1.5),
    ("useful", 1.9),
    ("useless", -1.8),
    ("welcome", 2.0),
    ("wonderful", 2.7),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "won't", "don't", "doesn't", "isn't", "aren't", "wasn't", "shouldn't", "wouldn't",
];

const BOOSTERS: &[&str] = &[
    "very",
    "extremely",
    "really",
    "highly",
    "incredibly",
    "absolutely",
    "completely",
    "totally",
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid word regex"))
}

/// Built-in lexicon analyzer with negation and booster handling.
#[derive(Debug, Clone)]
pub struct LexiconSentimentAnalyzer {
    valences: HashMap<&'static str, f64>,
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
        }
    }
}

impl LexiconSentimentAnalyzer {
    fn sentiment_sum(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = word_re()
            .find_iter(&lowered)
            .map(|found| found.as_str())
            .collect();

        let mut sum = 0.0;
        for (index, word) in words.iter().enumerate() {
            let Some(&base) = self.valences.get(*word) else {
                continue;
            };

            let mut valence = base;
            let window_start = index.saturating_sub(3);
            let preceding = &words[window_start..index];

            if let Some(previous) = preceding.last() {
                if BOOSTERS.contains(previous) {
                    valence += BOOSTER_INCREMENT * valence.signum();
                }
            }
            if preceding.iter().any(|word| NEGATIONS.contains(word)) {
                valence *= NEGATION_SCALAR;
            }
            sum += valence;
        }
        sum
    }
}

impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn compound(&self, text: &str) -> Result<f64, CapabilityError> {
        let sum = self.sentiment_sum(text);
        if !sum.is_finite() {
            return Err(CapabilityError::Failed {
                provider: "lexicon",
                message: "non-finite sentiment sum".to_string(),
            });
        }
        let compound = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
        Ok(compound.clamp(-1.0, 1.0))
    }
}
