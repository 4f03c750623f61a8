//! End-to-end grading through the public API: question bank references,
//! combined grading and CSV batches.

use std::sync::Arc;

use answer_grader::batch::BatchGrader;
use answer_grader::companion::{AssessmentSource, CompanionEvaluator, DeterministicEvaluator};
use answer_grader::questions::QuestionBank;
use answer_grader::{
    Category, EvaluationInput, EvaluationType, GradingRequest, GradingService, ScoringEngine,
};

mod common {
    use super::*;

    pub fn service() -> GradingService {
        GradingService::new(
            Arc::new(ScoringEngine::default()),
            Arc::new(DeterministicEvaluator),
        )
    }

    pub fn request(
        question: &str,
        candidate: &str,
        reference: &str,
        category: Category,
        evaluation_type: EvaluationType,
    ) -> GradingRequest {
        GradingRequest {
            question: question.to_string(),
            candidate_answer: candidate.to_string(),
            reference_answer: reference.to_string(),
            category,
            evaluation_type,
        }
    }
}

#[test]
fn bank_reference_answers_match_themselves() {
    let engine = ScoringEngine::default();
    let bank = QuestionBank::standard();

    for question in bank.questions() {
        let reference = question.reference_answer().expect("standard answer present");
        let input = EvaluationInput::new(question.text.as_str(), reference, reference)
            .with_category(question.category);
        let result = engine.evaluate(&input).expect("evaluation succeeds");

        assert!((0.0..=100.0).contains(&result.overall_score));
        assert!(
            result.unified_similarity >= 0.95,
            "{} similarity {}",
            question.id,
            result.unified_similarity
        );
    }
}

#[tokio::test]
async fn combined_grading_merges_engine_and_companion() {
    let service = common::service();
    let bank = QuestionBank::standard();
    let question = bank.get("g_pw_1").expect("general question");
    let reference = question.reference_answer().expect("standard answer");

    let report = service
        .evaluate(common::request(
            &question.text,
            reference,
            reference,
            question.category,
            EvaluationType::Both,
        ))
        .await
        .expect("grading succeeds");

    let ml = report.ml_score.expect("engine score");
    let gemini = report.gemini_score.expect("companion score");
    assert!((report.combined_score - (ml + gemini) / 2.0).abs() < 0.01);
    assert!(report.errors.is_empty());
    assert!(report.trace.as_ref().is_some_and(|trace| trace.contains_key("gemini")));
}

#[tokio::test]
async fn single_sided_requests_leave_the_other_side_empty() {
    let service = common::service();

    let ml_only = service
        .evaluate(common::request(
            "What is Rust?",
            "Rust is a systems programming language focused on safety.",
            "Rust is a systems programming language with memory safety.",
            Category::Technical,
            EvaluationType::Ml,
        ))
        .await
        .expect("grading succeeds");
    assert!(ml_only.gemini_score.is_none());
    assert_eq!(ml_only.ml_score, Some(ml_only.combined_score));
    assert_eq!(
        ml_only.explanations.gemini_explanation,
        "Gemini evaluation not performed"
    );

    let companion_only = service
        .evaluate(common::request(
            "What is Rust?",
            "Rust is a systems programming language focused on safety.",
            "Rust is a systems programming language with memory safety.",
            Category::Technical,
            EvaluationType::Gemini,
        ))
        .await
        .expect("grading succeeds");
    assert!(companion_only.ml_score.is_none());
    assert_eq!(companion_only.gemini_score, Some(companion_only.combined_score));
    assert_eq!(
        companion_only.explanations.ml_explanation,
        "ML evaluation not performed"
    );
}

#[tokio::test]
async fn deterministic_companion_is_stable() {
    let evaluator = DeterministicEvaluator;
    let first = evaluator
        .evaluate("What is Rust?", "A language.", "A systems language.")
        .await
        .expect("always available");
    let second = evaluator
        .evaluate("What is Rust?", "A language.", "A systems language.")
        .await
        .expect("always available");

    assert_eq!(first, second);
    assert_eq!(first.source, AssessmentSource::Deterministic);
    assert!(!evaluator.is_live());
}

#[test]
fn csv_batch_grades_each_row() {
    let engine = ScoringEngine::default();
    let csv = "\
question,candidate_answer,reference_answer,category
What is the capital of France?,Paris is the capital of France.,The capital of France is Paris.,general
Explain recursion.,A function that calls itself.,Recursion is when a function calls itself.,
";

    let report = BatchGrader::new(&engine, Category::Technical)
        .grade_reader(csv.as_bytes())
        .expect("well-formed csv");

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.graded(), 2);
    assert_eq!(report.outcomes[0].category, Category::General);
    assert_eq!(report.outcomes[1].category, Category::Technical);
    assert!(report.mean_score.is_some());
}
