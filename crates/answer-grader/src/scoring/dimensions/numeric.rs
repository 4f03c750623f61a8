use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::{Dimension, ScoringIssue};

const MISMATCH_PENALTY: f64 = 20.0;
const RELATIVE_TOLERANCE: f64 = 0.10;
const REFERENCE_ONLY_SCORE: f64 = 80.0;
const UNSUPPORTED_CANDIDATE_SCORE: f64 = 40.0;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?%?").expect("valid number regex"))
}

/// A hyphen joined to a preceding word or digit ("covid-19", "2-3") is not a sign.
fn signed_token<'t>(text: &str, found: regex::Match<'t>) -> &'t str {
    let token = found.as_str();
    let joined = text[..found.start()]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric);
    if joined {
        token.strip_prefix('-').unwrap_or(token)
    } else {
        token
    }
}

/// Numeric tokens in order of appearance; unparsable ones are reported.
pub(crate) fn extract_numbers(text: &str, issues: &mut Vec<ScoringIssue>) -> Vec<f64> {
    number_re()
        .find_iter(text)
        .filter_map(|found| {
            let token = signed_token(text, found);
            match token.trim_end_matches('%').parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    issues.push(ScoringIssue::new(
                        Dimension::NumericConsistency,
                        format!("skipped unparsable number `{token}`"),
                    ));
                    None
                }
            }
        })
        .collect()
}

fn relative_difference(left: f64, right: f64) -> f64 {
    let scale = left.abs().max(right.abs());
    if scale == 0.0 {
        0.0
    } else {
        (left - right).abs() / scale
    }
}

fn same_number(left: f64, right: f64) -> bool {
    relative_difference(left, right) <= f64::EPSILON
}

pub(crate) fn numeric_consistency(
    candidate: &[f64],
    reference: &[f64],
    question: &[f64],
    issues: &mut Vec<ScoringIssue>,
) -> f64 {
    match (candidate.is_empty(), reference.is_empty()) {
        (true, true) => 100.0,
        (true, false) => REFERENCE_ONLY_SCORE,
        (false, false) => {
            let mut score: f64 = 100.0;
            for (index, (left, right)) in candidate.iter().zip(reference).enumerate() {
                if relative_difference(*left, *right) > RELATIVE_TOLERANCE {
                    score -= MISMATCH_PENALTY;
                    issues.push(ScoringIssue::new(
                        Dimension::NumericConsistency,
                        format!("number #{} differs: candidate {left}, reference {right}", index + 1),
                    ));
                }
            }
            score.max(0.0)
        }
        (false, true) => {
            let unsupported: Vec<f64> = candidate
                .iter()
                .copied()
                .filter(|value| !question.iter().any(|asked| same_number(*value, *asked)))
                .collect();
            if unsupported.is_empty() {
                100.0
            } else {
                issues.push(ScoringIssue::new(
                    Dimension::NumericConsistency,
                    format!(
                        "candidate introduces {} number(s) absent from reference and question",
                        unsupported.len()
                    ),
                ));
                UNSUPPORTED_CANDIDATE_SCORE
            }
        }
    }
}
