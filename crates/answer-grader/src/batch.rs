//! CSV batch grading with the scoring engine.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::scoring::domain::round_to;
use crate::scoring::{Category, EvaluationInput, ScoringEngine};

#[derive(Debug)]
pub enum BatchError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Io(err) => write!(f, "failed to read batch file: {}", err),
            BatchError::Csv(err) => write!(f, "invalid batch CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io(err) => Some(err),
            BatchError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    question: String,
    candidate_answer: String,
    reference_answer: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// One graded row; `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub row: usize,
    pub category: Category,
    pub score: Option<f64>,
    pub explanation: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub mean_score: Option<f64>,
}

impl BatchReport {
    pub fn graded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.score.is_some()).count()
    }
}

pub struct BatchGrader<'a> {
    engine: &'a ScoringEngine,
    default_category: Category,
}

impl<'a> BatchGrader<'a> {
    pub fn new(engine: &'a ScoringEngine, default_category: Category) -> Self {
        Self {
            engine,
            default_category,
        }
    }

    pub fn grade_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport, BatchError> {
        let file = std::fs::File::open(path)?;
        self.grade_reader(file)
    }

    fn row_category(&self, row: usize, label: Option<&str>) -> Category {
        let Some(label) = label else {
            return self.default_category;
        };
        Category::parse_label(label).unwrap_or_else(|| {
            warn!(
                row,
                label,
                fallback = %self.default_category,
                "unknown category label in batch row"
            );
            self.default_category
        })
    }

    /// Malformed CSV aborts the batch; per-row scoring failures do not.
    pub fn grade_reader<R: Read>(&self, reader: R) -> Result<BatchReport, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut outcomes = Vec::new();
        for (index, record) in csv_reader.deserialize::<BatchRow>().enumerate() {
            let row = record?;
            let category = self.row_category(index + 1, row.category.as_deref());
            let input =
                EvaluationInput::new(row.question, row.candidate_answer, row.reference_answer)
                    .with_category(category);

            let outcome = match self.engine.evaluate(&input) {
                Ok(result) => BatchOutcome {
                    row: index + 1,
                    category,
                    score: Some(result.overall_score),
                    explanation: Some(result.explanation),
                    error: None,
                },
                Err(err) => {
                    warn!(row = index + 1, error = %err, "batch row could not be scored");
                    BatchOutcome {
                        row: index + 1,
                        category,
                        score: None,
                        explanation: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let scores: Vec<f64> = outcomes.iter().filter_map(|outcome| outcome.score).collect();
        let mean_score = if scores.is_empty() {
            None
        } else {
            Some(round_to(scores.iter().sum::<f64>() / scores.len() as f64, 2))
        };

        Ok(BatchReport {
            outcomes,
            mean_score,
        })
    }
}
