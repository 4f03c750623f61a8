//! Multi-signal answer scoring engine.
//!
//! One call runs: normalize, similarity ensemble and dimension scorers,
//! category weight lookup, aggregation, guardrail caps and the explanation.
//! Everything is built per call from the three input texts; the only shared
//! state is the read-only [`Capabilities`] handle set.

mod aggregate;
pub mod capabilities;
mod dimensions;
pub mod domain;
mod explanation;
pub mod guardrail;
pub mod normalizer;
pub mod profile;
pub mod similarity;
pub mod term_vector;
mod text;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::debug;

use crate::config::ScoringConfig;

pub use aggregate::aggregate;
pub use capabilities::{Capabilities, CapabilitySummary};
pub use dimensions::{RefusalAssessment, RefusalState};
pub use domain::{
    AppliedGuardrail, Category, Dimension, EvaluationInput, EvaluationResult, ScoringIssue,
    SimilarityMethod,
};
pub use explanation::{explain, ExplanationInput};
pub use guardrail::{GuardrailOutcome, GuardrailPolicy, GuardrailRule};
pub use normalizer::NormalizedText;
pub use profile::CategoryWeightProfile;
pub use similarity::{MethodScores, SimilarityEnsemble};

use dimensions::{score_dimensions, DimensionContext};
use domain::round_to;

/// Whole-call failures; per-dimension problems never surface here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("{field} exceeds the {limit}-character input limit")]
    InputTooLarge { field: &'static str, limit: usize },
    #[error("non-finite value produced during {stage}")]
    NonFinite { stage: &'static str },
}

/// Stateless scorer shared across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    capabilities: Capabilities,
    config: ScoringConfig,
    guardrails: GuardrailPolicy,
}

impl ScoringEngine {
    pub fn new(capabilities: Capabilities, config: ScoringConfig) -> Self {
        Self {
            capabilities,
            config,
            guardrails: GuardrailPolicy::default(),
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationResult, ScoringError> {
        self.check_limits(input)?;

        let question = NormalizedText::new(&input.question);
        let candidate = NormalizedText::new(&input.candidate_answer);
        let reference = NormalizedText::new(&input.reference_answer);

        let methods = SimilarityEnsemble::new(self.capabilities.language())
            .score(&candidate.normalized, &reference.normalized);

        let context = DimensionContext {
            question: &question,
            candidate: &candidate,
            reference: &reference,
            category: input.category,
            capabilities: &self.capabilities,
        };
        let report = score_dimensions(&context, &methods);

        let profile = CategoryWeightProfile::for_category(input.category);
        let base = aggregate(profile, report.scores())?;
        let outcome = self.guardrails.apply(input.category, base, report.scores());
        if !outcome.score.is_finite() {
            return Err(ScoringError::NonFinite { stage: "guardrail" });
        }

        let explanation = explain(&ExplanationInput {
            category: input.category,
            dimensions: report.scores(),
            methods: &methods,
            entity_model_available: self.capabilities.language().is_available(),
            guardrails: &outcome.applied,
        });

        for issue in &report.issues {
            debug!(dimension = %issue.dimension, detail = %issue.detail, "scoring issue absorbed");
        }
        debug!(
            category = %input.category,
            base = base,
            score = outcome.score,
            guardrails = outcome.applied.len(),
            refusal = ?report.refusal.map(|assessment| assessment.state),
            "answer scored"
        );

        let dimensions: BTreeMap<String, f64> = report
            .scores()
            .iter()
            .map(|(dimension, value)| (dimension.as_str().to_string(), round_to(*value, 2)))
            .collect();
        let method_scores: BTreeMap<String, f64> = methods
            .to_named_map()
            .into_iter()
            .map(|(name, value)| (name, round_to(value, 4)))
            .collect();

        let mut metrics = report.metrics.clone();
        metrics.insert(
            "unified_similarity".to_string(),
            json!(round_to(report.unified_similarity, 4)),
        );
        metrics.insert("method_scores".to_string(), json!(method_scores));
        metrics.insert("methods_used".to_string(), json!(methods.len()));
        metrics.insert(
            "tfidf_sim".to_string(),
            json!(methods.get(SimilarityMethod::Tfidf).map(|v| round_to(v, 4))),
        );
        metrics.insert(
            "word_vector_sim".to_string(),
            json!(methods
                .get(SimilarityMethod::WordVectors)
                .map(|v| round_to(v, 4))),
        );

        let mut trace: BTreeMap<String, Value> = report.trace.clone();
        trace.insert("base_score".to_string(), json!(round_to(base, 2)));
        trace.insert("guardrails".to_string(), json!(outcome.applied));
        trace.insert("issues".to_string(), json!(report.issues));
        trace.insert(
            "capabilities".to_string(),
            json!(self.capabilities.summary()),
        );

        Ok(EvaluationResult {
            overall_score: round_to(outcome.score, 2),
            category: input.category,
            unified_similarity: round_to(report.unified_similarity, 4),
            dimensions,
            method_scores,
            weights_used: profile.to_named_map(),
            explanation,
            metrics,
            trace,
        })
    }

    fn check_limits(&self, input: &EvaluationInput) -> Result<(), ScoringError> {
        let limit = self.config.max_input_chars;
        let fields = [
            ("question", &input.question),
            ("candidate_answer", &input.candidate_answer),
            ("reference_answer", &input.reference_answer),
        ];
        for (field, text) in fields {
            if text.chars().count() > limit {
                return Err(ScoringError::InputTooLarge { field, limit });
            }
        }
        Ok(())
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(Capabilities::none(), ScoringConfig::default())
    }
}
