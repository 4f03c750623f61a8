use crate::batch::BatchError;
use crate::companion::CompanionError;
use crate::config::ConfigError;
use crate::questions::QuestionBankError;
use crate::scoring::ScoringError;
use crate::service::GradingError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Request(JsonRejection),
    Scoring(ScoringError),
    Companion(CompanionError),
    Grading(GradingError),
    Questions(QuestionBankError),
    Batch(BatchError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Request(err) => write!(f, "invalid request: {}", err.body_text()),
            AppError::Scoring(err) => write!(f, "evaluation failed: {}", err),
            AppError::Companion(err) => write!(f, "companion evaluation failed: {}", err),
            AppError::Grading(err) => write!(f, "evaluation failed: {}", err),
            AppError::Questions(err) => write!(f, "question generation failed: {}", err),
            AppError::Batch(err) => write!(f, "batch grading failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Request(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Companion(err) => Some(err),
            AppError::Grading(err) => Some(err),
            AppError::Questions(err) => Some(err),
            AppError::Batch(err) => Some(err),
        }
    }
}

fn scoring_status(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::InputTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringError::NonFinite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Request(rejection) => rejection.status(),
            AppError::Scoring(err) | AppError::Grading(GradingError::Scoring(err)) => {
                scoring_status(err)
            }
            AppError::Questions(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Batch(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Companion(_)
            | AppError::Grading(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<CompanionError> for AppError {
    fn from(value: CompanionError) -> Self {
        Self::Companion(value)
    }
}

impl From<GradingError> for AppError {
    fn from(value: GradingError) -> Self {
        Self::Grading(value)
    }
}

impl From<QuestionBankError> for AppError {
    fn from(value: QuestionBankError) -> Self {
        Self::Questions(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}
