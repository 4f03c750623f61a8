use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::companion::{CompanionAssessment, CompanionError, CompanionEvaluator};
use crate::scoring::domain::round_to;
use crate::scoring::{Category, EvaluationInput, EvaluationResult, ScoringEngine, ScoringError};

/// Which evaluators a grading request runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    Ml,
    Gemini,
    #[default]
    Both,
}

impl EvaluationType {
    fn runs_engine(self) -> bool {
        matches!(self, EvaluationType::Ml | EvaluationType::Both)
    }

    fn runs_companion(self) -> bool {
        matches!(self, EvaluationType::Gemini | EvaluationType::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingRequest {
    pub question: String,
    #[serde(alias = "chatbot_answer")]
    pub candidate_answer: String,
    #[serde(alias = "manual_answer")]
    pub reference_answer: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub evaluation_type: EvaluationType,
}

impl GradingRequest {
    pub fn input(&self) -> EvaluationInput {
        EvaluationInput::new(
            self.question.clone(),
            self.candidate_answer.clone(),
            self.reference_answer.clone(),
        )
        .with_category(self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineDetails {
    pub similarity: f64,
    pub completeness: f64,
    pub accuracy: f64,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanations {
    pub ml_explanation: String,
    pub gemini_explanation: String,
}

/// Combined outcome of the engine and the companion evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingReport {
    pub ml_score: Option<f64>,
    pub gemini_score: Option<f64>,
    pub combined_score: f64,
    pub details: HeadlineDetails,
    pub explanations: Explanations,
    /// Seconds spent on the request.
    pub processing_time: f64,
    pub ml_details: Option<BTreeMap<String, f64>>,
    pub gemini_details: Option<BTreeMap<String, f64>>,
    pub ml_metrics: Option<BTreeMap<String, Value>>,
    pub gemini_metrics: Option<Value>,
    pub trace: Option<BTreeMap<String, Value>>,
    pub weights: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Companion(#[from] CompanionError),
    #[error("scoring task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("all evaluators failed: {}", .0.join("; "))]
    AllEvaluatorsFailed(Vec<String>),
}

/// Runs the scoring engine and the companion evaluator side by side.
pub struct GradingService {
    engine: Arc<ScoringEngine>,
    companion: Arc<dyn CompanionEvaluator>,
}

impl GradingService {
    pub fn new(engine: Arc<ScoringEngine>, companion: Arc<dyn CompanionEvaluator>) -> Self {
        Self { engine, companion }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn companion(&self) -> &dyn CompanionEvaluator {
        self.companion.as_ref()
    }

    /// Engine only; scoring runs on the blocking pool.
    pub async fn evaluate_ml(
        &self,
        input: EvaluationInput,
    ) -> Result<EvaluationResult, GradingError> {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || engine.evaluate(&input)).await??;
        Ok(result)
    }

    /// Companion only; its errors surface unchanged.
    pub async fn evaluate_companion(
        &self,
        input: &EvaluationInput,
    ) -> Result<CompanionAssessment, GradingError> {
        let assessment = self
            .companion
            .evaluate(
                &input.question,
                &input.candidate_answer,
                &input.reference_answer,
            )
            .await?;
        Ok(assessment)
    }

    /// Run the requested sides concurrently and merge what succeeded.
    pub async fn evaluate(&self, request: GradingRequest) -> Result<GradingReport, GradingError> {
        let started = Instant::now();
        let input = request.input();
        let evaluation_type = request.evaluation_type;

        let engine_side = async {
            if evaluation_type.runs_engine() {
                Some(self.evaluate_ml(input.clone()).await)
            } else {
                None
            }
        };
        let companion_side = async {
            if evaluation_type.runs_companion() {
                Some(self.evaluate_companion(&input).await)
            } else {
                None
            }
        };
        let (engine_outcome, companion_outcome) = tokio::join!(engine_side, companion_side);

        let mut errors = Vec::new();
        let ml = match engine_outcome {
            Some(Ok(result)) => Some(result),
            Some(Err(error)) => {
                warn!(%error, "scoring engine failed");
                errors.push(format!("ml: {error}"));
                None
            }
            None => None,
        };
        let gemini = match companion_outcome {
            Some(Ok(assessment)) => Some(assessment),
            Some(Err(error)) => {
                warn!(%error, evaluator = self.companion.name(), "companion evaluator failed");
                errors.push(format!("gemini: {error}"));
                None
            }
            None => None,
        };

        let combined_score = match (&ml, &gemini) {
            (Some(ml), Some(gemini)) => round_to((ml.overall_score + gemini.score) / 2.0, 2),
            (Some(ml), None) => ml.overall_score,
            (None, Some(gemini)) => gemini.score,
            (None, None) => return Err(GradingError::AllEvaluatorsFailed(errors)),
        };

        let processing_time = started.elapsed().as_secs_f64();
        info!(
            category = %request.category,
            ?evaluation_type,
            combined_score,
            processing_ms = processing_time * 1000.0,
            "answer graded"
        );

        Ok(build_report(ml, gemini, combined_score, processing_time, errors))
    }
}

fn build_report(
    ml: Option<EvaluationResult>,
    gemini: Option<CompanionAssessment>,
    combined_score: f64,
    processing_time: f64,
    errors: Vec<String>,
) -> GradingReport {
    let ml_value = |name: &str| ml.as_ref().and_then(|result| result.dimensions.get(name).copied());
    let gemini_value = |name: &str| gemini.as_ref().and_then(|assessment| assessment.detail(name));

    let details = HeadlineDetails {
        similarity: ml_value("similarity").or(gemini_value("similarity")).unwrap_or(0.0),
        accuracy: ml_value("accuracy").or(gemini_value("accuracy")).unwrap_or(0.0),
        completeness: gemini_value("completeness")
            .or(ml_value("completeness"))
            .unwrap_or(0.0),
        relevance: gemini_value("relevance").or(ml_value("relevance")).unwrap_or(0.0),
    };

    let explanations = Explanations {
        ml_explanation: ml
            .as_ref()
            .map(|result| result.explanation.clone())
            .unwrap_or_else(|| "ML evaluation not performed".to_string()),
        gemini_explanation: gemini
            .as_ref()
            .map(|assessment| assessment.explanation.clone())
            .unwrap_or_else(|| "Gemini evaluation not performed".to_string()),
    };

    let gemini_metrics = gemini.as_ref().map(|assessment| {
        json!({
            "method_scores": assessment.method_scores,
            "strengths": assessment.strengths,
            "weaknesses": assessment.weaknesses,
            "source": assessment.source.label(),
        })
    });

    let mut trace: BTreeMap<String, Value> = ml
        .as_ref()
        .map(|result| result.trace.clone())
        .unwrap_or_default();
    if let Some(assessment) = &gemini {
        trace.insert(
            "gemini".to_string(),
            json!({
                "top_k_evidence": assessment.top_k_evidence,
                "hallucination_flags": assessment.hallucination_flags,
            }),
        );
    }

    GradingReport {
        ml_score: ml.as_ref().map(|result| result.overall_score),
        gemini_score: gemini.as_ref().map(|assessment| assessment.score),
        combined_score,
        details,
        explanations,
        processing_time,
        ml_details: ml.as_ref().map(|result| result.dimensions.clone()),
        gemini_details: gemini.as_ref().map(|assessment| assessment.details.clone()),
        ml_metrics: ml.as_ref().map(|result| result.metrics.clone()),
        gemini_metrics,
        trace: (!trace.is_empty()).then_some(trace),
        weights: ml.map(|result| result.weights_used),
        errors,
    }
}
