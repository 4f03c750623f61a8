use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::companion::CompanionAssessment;
use crate::error::AppError;
use crate::questions::{self, CategoryListing, Difficulty, Question, QuestionBank};
use crate::scoring::{Category, EvaluationResult};
use crate::service::{GradingReport, GradingRequest, GradingService};

/// Shared handles for the grading endpoints.
#[derive(Clone)]
pub struct GradingState {
    pub service: Arc<GradingService>,
    pub questions: Arc<QuestionBank>,
}

impl GradingState {
    pub fn new(service: Arc<GradingService>, questions: Arc<QuestionBank>) -> Self {
        Self { service, questions }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub category: Category,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

fn default_count() -> usize {
    5
}

/// Evaluation and question-bank endpoints under `/api`.
pub fn grading_router(state: GradingState) -> Router {
    Router::new()
        .route("/api/evaluate", post(evaluate_handler))
        .route("/api/evaluate/ml", post(evaluate_ml_handler))
        .route("/api/evaluate/gemini", post(evaluate_companion_handler))
        .route("/api/questions", get(questions_handler))
        .route("/api/questions/generate", post(generate_questions_handler))
        .route("/api/questions/categories", get(categories_handler))
        .with_state(state)
}

pub(crate) async fn evaluate_handler(
    State(state): State<GradingState>,
    payload: Result<Json<GradingRequest>, JsonRejection>,
) -> Result<Json<GradingReport>, AppError> {
    let Json(request) = payload?;
    let report = state.service.evaluate(request).await?;
    Ok(Json(report))
}

pub(crate) async fn evaluate_ml_handler(
    State(state): State<GradingState>,
    payload: Result<Json<GradingRequest>, JsonRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let Json(request) = payload?;
    let result = state.service.evaluate_ml(request.input()).await?;
    Ok(Json(result))
}

pub(crate) async fn evaluate_companion_handler(
    State(state): State<GradingState>,
    payload: Result<Json<GradingRequest>, JsonRejection>,
) -> Result<Json<CompanionAssessment>, AppError> {
    let Json(request) = payload?;
    let assessment = state.service.evaluate_companion(&request.input()).await?;
    Ok(Json(assessment))
}

pub(crate) async fn questions_handler(State(state): State<GradingState>) -> Json<Vec<Question>> {
    Json(state.questions.questions().to_vec())
}

pub(crate) async fn generate_questions_handler(
    payload: Result<Json<GenerateQuestionsRequest>, JsonRejection>,
) -> Result<Json<Vec<Question>>, AppError> {
    let Json(request) = payload?;
    let generated = questions::generate(request.category, request.count, request.difficulty)?;
    Ok(Json(generated))
}

pub(crate) async fn categories_handler() -> Json<CategoryListing> {
    Json(questions::categories())
}
