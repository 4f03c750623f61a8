//! Independent LLM-backed assessment merged with the engine score.
//!
//! The companion never fails a grading request on malformed model output:
//! [`parse::parse_response`] degrades from strict JSON to a regex partial
//! parse and finally to a fixed fallback. Transport failures inside
//! [`GeminiEvaluator`] fall back to the deterministic assessment.

mod gemini;
mod mock;
mod parse;
mod prompt;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiEvaluator;
pub use mock::DeterministicEvaluator;
pub use parse::parse_response;
pub use prompt::evaluation_prompt;

/// How an assessment was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    Model,
    PartialParse,
    Fallback,
    Deterministic,
}

impl AssessmentSource {
    pub fn label(self) -> &'static str {
        match self {
            AssessmentSource::Model => "model",
            AssessmentSource::PartialParse => "partial_parse",
            AssessmentSource::Fallback => "fallback",
            AssessmentSource::Deterministic => "deterministic",
        }
    }
}

/// Retrieval evidence quoted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HallucinationFlags {
    #[serde(default)]
    pub is_hallucinated: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Companion verdict using the engine's dimension names on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionAssessment {
    pub score: f64,
    pub details: BTreeMap<String, f64>,
    pub explanation: String,
    #[serde(default)]
    pub method_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub top_k_evidence: Vec<Evidence>,
    #[serde(default)]
    pub hallucination_flags: HallucinationFlags,
    pub source: AssessmentSource,
}

impl CompanionAssessment {
    pub fn detail(&self, name: &str) -> Option<f64> {
        self.details.get(name).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    #[error("companion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("companion API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("companion response contained no text")]
    EmptyResponse,
    #[error("companion evaluator unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CompanionEvaluator: Send + Sync {
    fn name(&self) -> &str;

    /// Whether assessments come from a live model rather than the formula.
    fn is_live(&self) -> bool {
        false
    }

    async fn evaluate(
        &self,
        question: &str,
        candidate: &str,
        reference: &str,
    ) -> Result<CompanionAssessment, CompanionError>;
}
