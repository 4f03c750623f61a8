//! Answer grading: a multi-signal scoring engine, an optional LLM companion
//! evaluator and the HTTP surface that combines them.

pub mod batch;
pub mod companion;
pub mod config;
pub mod error;
pub mod questions;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use router::{grading_router, GradingState};
pub use scoring::{
    Capabilities, Category, EvaluationInput, EvaluationResult, ScoringEngine, ScoringError,
};
pub use service::{EvaluationType, GradingError, GradingReport, GradingRequest, GradingService};
