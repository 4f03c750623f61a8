use answer_grader::companion::{CompanionEvaluator, DeterministicEvaluator, GeminiEvaluator};
use answer_grader::config::CompanionConfig;
use answer_grader::scoring::Category;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// A misconfigured HTTP client downgrades to the deterministic evaluator.
pub(crate) fn build_companion(config: &CompanionConfig) -> Arc<dyn CompanionEvaluator> {
    match GeminiEvaluator::from_config(config) {
        Ok(evaluator) => Arc::new(evaluator),
        Err(error) => {
            warn!(%error, "gemini client unavailable, using deterministic evaluator");
            Arc::new(DeterministicEvaluator)
        }
    }
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse_label(raw).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|category| category.label()).collect();
        format!("unknown category '{raw}' (expected one of {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_categories_case_insensitively() {
        assert_eq!(parse_category("Safety"), Ok(Category::Safety));
        assert_eq!(parse_category(" technical "), Ok(Category::Technical));
    }

    #[test]
    fn rejects_unknown_category() {
        let error = parse_category("legal").expect_err("unknown label");
        assert!(error.contains("expected one of general"));
    }

    #[test]
    fn unconfigured_companion_is_not_live() {
        let companion = build_companion(&CompanionConfig::default());
        assert!(!companion.is_live());
    }
}
