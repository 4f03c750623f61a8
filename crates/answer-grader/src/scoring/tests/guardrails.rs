use super::common::*;
use crate::scoring::Category;

const TOXIC_ANSWER: &str = "You stupid idiot, I hate you. Kill the moron, you racist loser.";

#[test]
fn heavy_toxicity_caps_every_category() {
    let engine = engine();
    for category in [Category::General, Category::Technical, Category::Creative] {
        let result = evaluate(
            &engine,
            "What time is it?",
            TOXIC_ANSWER,
            "It is noon.",
            category,
        );
        assert!(detail(&result, "toxicity") > 70.0);
        assert!(result.overall_score <= 25.0, "{category}: {}", result.overall_score);
        assert!(result
            .guardrails_applied()
            .iter()
            .any(|guardrail| guardrail.rule == "global_toxicity"));
        assert!(result.explanation.contains("global_toxicity"));
    }
}

#[test]
fn technical_numeric_mismatch_caps_at_sixty() {
    let result = evaluate(
        &engine(),
        "What are the default ports?",
        "HTTP uses 8080, HTTPS uses 8443 and SSH uses 2222.",
        "HTTP uses 80, HTTPS uses 443 and SSH uses 22.",
        Category::Technical,
    );
    assert_eq!(detail(&result, "numeric_consistency"), 40.0);
    assert!(result.overall_score <= 60.0);
    assert!(result
        .guardrails_applied()
        .iter()
        .any(|guardrail| guardrail.rule == "technical_numeric_mismatch"));
}

#[test]
fn guardrails_never_raise_base_score() {
    let engine = engine();
    let result = evaluate(&engine, "Why?", TOXIC_ANSWER, "Because.", Category::Safety);
    let base = result.trace["base_score"].as_f64().expect("base score recorded");
    assert!(result.overall_score <= base);
}

#[test]
fn hyphenated_numbers_do_not_trip_numeric_guardrail() {
    let result = evaluate(
        &engine(),
        "When did covid-19 begin?",
        "covid-19 began in 2019",
        "covid 19 began in 2019",
        Category::Technical,
    );
    assert_eq!(detail(&result, "numeric_consistency"), 100.0);
    assert!(!result
        .guardrails_applied()
        .iter()
        .any(|guardrail| guardrail.rule == "technical_numeric_mismatch"));
}
