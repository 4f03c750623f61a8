use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Question category steering weights and guardrails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    General,
    Safety,
    Technical,
    Creative,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Safety,
        Category::Technical,
        Category::Creative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Safety => "safety",
            Category::Technical => "technical",
            Category::Creative => "creative",
        }
    }

    /// Unknown or blank labels fall back to `General`.
    /// Strict lookup; `None` for labels outside the four categories.
    pub fn parse_label(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == wanted)
    }

    /// Lenient lookup: unknown labels grade as general.
    pub fn from_label(value: &str) -> Self {
        Self::parse_label(value).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three texts under comparison plus the question category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub question: String,
    #[serde(alias = "chatbot_answer")]
    pub candidate_answer: String,
    #[serde(alias = "manual_answer")]
    pub reference_answer: String,
    #[serde(default)]
    pub category: Category,
}

impl EvaluationInput {
    pub fn new(
        question: impl Into<String>,
        candidate_answer: impl Into<String>,
        reference_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            candidate_answer: candidate_answer.into(),
            reference_answer: reference_answer.into(),
            category: Category::General,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Quality axes reported in the result details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Similarity,
    Accuracy,
    Completeness,
    Relevance,
    Readability,
    Clarity,
    Sentiment,
    Toxicity,
    Bias,
    IntentMatch,
    FactualConsistency,
    EntityAgreement,
    RefusalCompliance,
    NumericConsistency,
    LengthAdequacy,
    Structure,
    LexicalDiversity,
    Repetition,
    Formatting,
}

impl Dimension {
    pub const ALL: [Dimension; 19] = [
        Dimension::Similarity,
        Dimension::Accuracy,
        Dimension::Completeness,
        Dimension::Relevance,
        Dimension::Readability,
        Dimension::Clarity,
        Dimension::Sentiment,
        Dimension::Toxicity,
        Dimension::Bias,
        Dimension::IntentMatch,
        Dimension::FactualConsistency,
        Dimension::EntityAgreement,
        Dimension::RefusalCompliance,
        Dimension::NumericConsistency,
        Dimension::LengthAdequacy,
        Dimension::Structure,
        Dimension::LexicalDiversity,
        Dimension::Repetition,
        Dimension::Formatting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Similarity => "similarity",
            Dimension::Accuracy => "accuracy",
            Dimension::Completeness => "completeness",
            Dimension::Relevance => "relevance",
            Dimension::Readability => "readability",
            Dimension::Clarity => "clarity",
            Dimension::Sentiment => "sentiment",
            Dimension::Toxicity => "toxicity",
            Dimension::Bias => "bias",
            Dimension::IntentMatch => "intent_match",
            Dimension::FactualConsistency => "factual_consistency",
            Dimension::EntityAgreement => "entity_agreement",
            Dimension::RefusalCompliance => "refusal_compliance",
            Dimension::NumericConsistency => "numeric_consistency",
            Dimension::LengthAdequacy => "length_adequacy",
            Dimension::Structure => "structure",
            Dimension::LexicalDiversity => "lexical_diversity",
            Dimension::Repetition => "repetition",
            Dimension::Formatting => "formatting",
        }
    }

    /// Dimensions where a higher value is worse.
    pub fn is_penalty(self) -> bool {
        matches!(self, Dimension::Toxicity | Dimension::Bias)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ensemble members that can contribute to unified similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    Tfidf,
    WordVectors,
    Custom,
}

impl SimilarityMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityMethod::Tfidf => "tfidf",
            SimilarityMethod::WordVectors => "word_vectors",
            SimilarityMethod::Custom => "custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SimilarityMethod::Tfidf => "term-vector cosine",
            SimilarityMethod::WordVectors => "word-vector similarity",
            SimilarityMethod::Custom => "custom composite",
        }
    }
}

/// A non-fatal problem absorbed while scoring one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringIssue {
    pub dimension: Dimension,
    pub detail: String,
}

impl ScoringIssue {
    pub(crate) fn new(dimension: Dimension, detail: impl Into<String>) -> Self {
        Self {
            dimension,
            detail: detail.into(),
        }
    }
}

/// Cap applied by the guardrail policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedGuardrail {
    pub rule: String,
    pub cap: f64,
}

/// Final, immutable outcome of one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "score")]
    pub overall_score: f64,
    pub category: Category,
    pub unified_similarity: f64,
    #[serde(rename = "details")]
    pub dimensions: BTreeMap<String, f64>,
    pub method_scores: BTreeMap<String, f64>,
    #[serde(rename = "weights")]
    pub weights_used: BTreeMap<String, f64>,
    pub explanation: String,
    pub metrics: BTreeMap<String, Value>,
    pub trace: BTreeMap<String, Value>,
}

impl EvaluationResult {
    pub fn dimension(&self, dimension: Dimension) -> Option<f64> {
        self.dimensions.get(dimension.as_str()).copied()
    }

    pub fn guardrails_applied(&self) -> Vec<AppliedGuardrail> {
        self.trace
            .get("guardrails")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
