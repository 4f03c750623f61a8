//! Optional linguistic providers consulted by the dimension scorers.
//!
//! Every provider has a null implementation. [`Capabilities::probe`] runs once
//! at startup and the resulting handles are shared read-only across calls;
//! scorers ask `is_available()` and fall back to their neutral defaults.

mod lexicon;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ScoringConfig;

pub use lexicon::LexiconSentimentAnalyzer;

/// Failure reported by an optional provider; always absorbed by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{provider} is not available")]
    Unavailable { provider: &'static str },
    #[error("{provider} failed: {message}")]
    Failed {
        provider: &'static str,
        message: String,
    },
}

/// Named entity with its type label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub label: String,
}

/// Dense-vector linguistic model (document similarity and entity recognition).
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn similarity(&self, left: &str, right: &str) -> Result<f64, CapabilityError>;

    fn entities(&self, text: &str) -> Result<Vec<NamedEntity>, CapabilityError>;
}

/// Grammar checking service counting issues in a text.
pub trait GrammarChecker: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn count_issues(&self, text: &str) -> Result<usize, CapabilityError>;
}

/// Sentiment analyzer producing a compound polarity in [-1, 1].
pub trait SentimentAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn compound(&self, text: &str) -> Result<f64, CapabilityError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLanguageModel;

impl LanguageModel for NullLanguageModel {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn similarity(&self, _left: &str, _right: &str) -> Result<f64, CapabilityError> {
        Err(CapabilityError::Unavailable {
            provider: "language model",
        })
    }

    fn entities(&self, _text: &str) -> Result<Vec<NamedEntity>, CapabilityError> {
        Err(CapabilityError::Unavailable {
            provider: "language model",
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullGrammarChecker;

impl GrammarChecker for NullGrammarChecker {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn count_issues(&self, _text: &str) -> Result<usize, CapabilityError> {
        Err(CapabilityError::Unavailable {
            provider: "grammar checker",
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSentimentAnalyzer;

impl SentimentAnalyzer for NullSentimentAnalyzer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn compound(&self, _text: &str) -> Result<f64, CapabilityError> {
        Err(CapabilityError::Unavailable {
            provider: "sentiment analyzer",
        })
    }
}

/// Process-wide provider handles, immutable once built.
#[derive(Clone)]
pub struct Capabilities {
    language: Arc<dyn LanguageModel>,
    grammar: Arc<dyn GrammarChecker>,
    sentiment: Arc<dyn SentimentAnalyzer>,
}

impl Capabilities {
    /// Every provider unavailable.
    pub fn none() -> Self {
        Self {
            language: Arc::new(NullLanguageModel),
            grammar: Arc::new(NullGrammarChecker),
            sentiment: Arc::new(NullSentimentAnalyzer),
        }
    }

    /// One-time availability probe run before serving traffic.
    pub fn probe(config: &ScoringConfig) -> Self {
        let mut capabilities = Self::none();
        if config.sentiment_lexicon {
            capabilities.sentiment = Arc::new(LexiconSentimentAnalyzer::default());
        }

        info!(
            language_model = capabilities.language.is_available(),
            grammar_checker = capabilities.grammar.is_available(),
            sentiment = capabilities.sentiment.name(),
            "scoring capabilities probed"
        );
        capabilities
    }

    pub fn with_language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language = model;
        self
    }

    pub fn with_grammar_checker(mut self, checker: Arc<dyn GrammarChecker>) -> Self {
        self.grammar = checker;
        self
    }

    pub fn with_sentiment_analyzer(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = analyzer;
        self
    }

    pub fn language(&self) -> &dyn LanguageModel {
        self.language.as_ref()
    }

    pub fn grammar(&self) -> &dyn GrammarChecker {
        self.grammar.as_ref()
    }

    pub fn sentiment(&self) -> &dyn SentimentAnalyzer {
        self.sentiment.as_ref()
    }

    pub fn summary(&self) -> CapabilitySummary {
        CapabilitySummary {
            language_model: self.language.is_available().then(|| self.language.name()),
            grammar_checker: self.grammar.is_available().then(|| self.grammar.name()),
            sentiment_analyzer: self.sentiment.is_available().then(|| self.sentiment.name()),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("language", &self.language.name())
            .field("grammar", &self.grammar.name())
            .field("sentiment", &self.sentiment.name())
            .finish()
    }
}

/// Provider names in use, `None` for unavailable ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySummary {
    pub language_model: Option<&'static str>,
    pub grammar_checker: Option<&'static str>,
    pub sentiment_analyzer: Option<&'static str>,
}
