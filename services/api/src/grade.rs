use crate::infra::parse_category;
use answer_grader::batch::{BatchGrader, BatchReport};
use answer_grader::config::AppConfig;
use answer_grader::error::AppError;
use answer_grader::questions::{Question, QuestionBank};
use answer_grader::{
    telemetry, Capabilities, Category, EvaluationInput, EvaluationResult, ScoringEngine,
};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Question the candidate answered
    #[arg(long)]
    pub(crate) question: String,
    /// Answer being graded
    #[arg(long)]
    pub(crate) candidate: String,
    /// Reference answer to grade against
    #[arg(long)]
    pub(crate) reference: String,
    /// Question category (general, safety, technical, creative)
    #[arg(long, default_value = "general", value_parser = parse_category)]
    pub(crate) category: Category,
    /// Print the full evaluation result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with question,candidate_answer,reference_answer[,category] columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Category for rows without one
    #[arg(long, default_value = "general", value_parser = parse_category)]
    pub(crate) category: Category,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Only list questions in this category
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<Category>,
}

fn cli_engine() -> Result<ScoringEngine, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;
    let capabilities = Capabilities::probe(&config.scoring);
    Ok(ScoringEngine::new(capabilities, config.scoring))
}

pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let GradeArgs {
        question,
        candidate,
        reference,
        category,
        json,
    } = args;

    let engine = cli_engine()?;
    let input = EvaluationInput::new(question, candidate, reference).with_category(category);
    let result = engine.evaluate(&input)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_result(&result));
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let engine = cli_engine()?;
    let report = BatchGrader::new(&engine, args.category).grade_path(&args.csv)?;
    print!("{}", render_batch(&report));
    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let bank = QuestionBank::standard();
    let selected: Vec<&Question> = match args.category {
        Some(category) => bank.by_category(category).collect(),
        None => bank.questions().iter().collect(),
    };
    print!("{}", render_questions(&selected));
    Ok(())
}

pub(crate) fn render_result(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score: {:.2} / 100 ({})",
        result.overall_score, result.category
    );
    let _ = writeln!(out, "Unified similarity: {:.4}", result.unified_similarity);
    let _ = writeln!(out, "Dimensions:");
    for (name, value) in &result.dimensions {
        let _ = writeln!(out, "  - {name}: {value:.1}");
    }

    let guardrails = result.guardrails_applied();
    if !guardrails.is_empty() {
        let _ = writeln!(out, "Guardrails:");
        for guardrail in guardrails {
            let _ = writeln!(out, "  - {} capped at {:.0}", guardrail.rule, guardrail.cap);
        }
    }

    let _ = writeln!(out, "Explanation: {}", result.explanation);
    out
}

pub(crate) fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let prefix = format!("row {} [{}]", outcome.row, outcome.category);
        let _ = match (outcome.score, &outcome.error) {
            (Some(score), _) => writeln!(out, "{prefix} score {score:.2}"),
            (None, Some(error)) => writeln!(out, "{prefix} error: {error}"),
            (None, None) => writeln!(out, "{prefix} not graded"),
        };
    }

    match report.mean_score {
        Some(mean) => {
            let _ = writeln!(
                out,
                "Graded {} of {} rows, mean score {:.2}",
                report.graded(),
                report.outcomes.len(),
                mean
            );
        }
        None => {
            let _ = writeln!(out, "No rows graded");
        }
    }
    out
}

pub(crate) fn render_questions(questions: &[&Question]) -> String {
    let mut out = String::new();
    for question in questions {
        let _ = writeln!(
            out,
            "[{}] ({}/{}) {}",
            question.id,
            question.category,
            question.difficulty.label(),
            question.text
        );
        if let Some(reference) = question.reference_answer() {
            let _ = writeln!(out, "    reference: {reference}");
        }
    }
    out
}
