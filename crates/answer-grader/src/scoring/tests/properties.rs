use super::common::*;
use crate::config::ScoringConfig;
use crate::scoring::capabilities::Capabilities;
use crate::scoring::{Category, Dimension, EvaluationInput, ScoringEngine, ScoringError};

const SAMPLES: &[(&str, &str, &str)] = &[
    ("", "", ""),
    ("What is Rust?", "", "A systems language."),
    ("What is Rust?", "A systems language.", ""),
    (
        "How do I reverse a list in Python?",
        "Use list.reverse() or slicing with [::-1].",
        "Call reverse() on the list, or use slicing.",
    ),
    (
        "Why is the sky blue?",
        "You idiot, obviously everyone knows it is always blue. 100% of the time!!!",
        "Rayleigh scattering favors shorter wavelengths.",
    ),
    ("Explain TCP.", "um uh like basically", "A reliable transport protocol."),
];

#[test]
fn outputs_stay_within_bounds_for_every_category() {
    let engine = engine();
    for category in Category::ALL {
        for (question, candidate, reference) in SAMPLES {
            let result = evaluate(&engine, question, candidate, reference, category);
            assert!((0.0..=100.0).contains(&result.overall_score), "{result:?}");
            assert!((0.0..=1.0).contains(&result.unified_similarity), "{result:?}");
            for (name, value) in &result.dimensions {
                assert!((0.0..=100.0).contains(value), "{name} = {value}");
            }
            for (name, value) in &result.method_scores {
                assert!((0.0..=1.0).contains(value), "{name} = {value}");
            }
            assert_eq!(result.dimensions.len(), Dimension::ALL.len());
        }
    }
}

#[test]
fn identical_answers_score_as_near_duplicates() {
    let text = "Unit tests should be fast, isolated and deterministic.";
    let result = evaluate(&engine(), "What makes a good unit test?", text, text, Category::General);
    assert!(result.unified_similarity >= 0.95, "{}", result.unified_similarity);
    assert!(detail(&result, "accuracy") >= 90.0);
}

#[test]
fn empty_texts_are_identical_and_complete() {
    let result = evaluate(&engine(), "Anything?", "", "", Category::General);
    assert_eq!(result.unified_similarity, 1.0);
    assert_eq!(detail(&result, "completeness"), 100.0);
}

#[test]
fn texts_without_words_match_themselves() {
    for text in ["Um.", "#@$"] {
        let result = evaluate(&engine(), "Anything?", text, text, Category::General);
        assert_eq!(result.unified_similarity, 1.0, "{text}");
        assert_eq!(detail(&result, "accuracy"), 100.0, "{text}");
    }
}

#[test]
fn missing_reference_gives_neutral_completeness() {
    let result = evaluate(&engine(), "Anything?", "Something useful.", "", Category::General);
    assert_eq!(detail(&result, "completeness"), 50.0);
    assert_eq!(detail(&result, "length_adequacy"), 80.0);
}

#[test]
fn short_candidate_lands_in_forty_band() {
    let result = evaluate(
        &engine(),
        "Name some greek letters.",
        "alpha beta gamma delta",
        "alpha beta gamma delta epsilon zeta eta theta iota kappa",
        Category::General,
    );
    assert_eq!(detail(&result, "length_adequacy"), 40.0);
}

#[test]
fn evaluation_is_deterministic() {
    let engine = engine();
    let (question, candidate, reference) = SAMPLES[3];
    let first = evaluate(&engine, question, candidate, reference, Category::Technical);
    let second = evaluate(&engine, question, candidate, reference, Category::Technical);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn unavailable_providers_use_neutral_defaults() {
    let result = evaluate(&engine(), "Is it good?", "It is good.", "It is fine.", Category::General);
    assert_eq!(detail(&result, "clarity"), 70.0);
    assert_eq!(detail(&result, "sentiment"), 50.0);
    assert_eq!(detail(&result, "entity_agreement"), 50.0);
    assert!(!result.method_scores.contains_key("word_vectors"));
    assert_eq!(result.metrics["methods_used"], serde_json::json!(2));
}

#[test]
fn language_model_joins_the_ensemble() {
    let result = evaluate(
        &model_engine(),
        "Where is the Eiffel Tower?",
        "The Eiffel Tower is in Paris.",
        "It stands in Paris, France.",
        Category::General,
    );
    assert!(result.method_scores.contains_key("word_vectors"));
    assert_eq!(result.metrics["methods_used"], serde_json::json!(3));
    assert_ne!(detail(&result, "entity_agreement"), 50.0);
    assert!(result.explanation.contains("word-vector similarity"));
}

#[test]
fn lexicon_sentiment_moves_off_neutral() {
    let result = evaluate(
        &lexicon_engine(),
        "How was the release?",
        "The release was great and the team was happy.",
        "It went well.",
        Category::Creative,
    );
    assert!(detail(&result, "sentiment") > 60.0);
}

#[test]
fn oversized_input_is_rejected() {
    let engine = ScoringEngine::new(
        Capabilities::none(),
        ScoringConfig {
            max_input_chars: 10,
            ..ScoringConfig::default()
        },
    );
    let input = EvaluationInput::new("short", "this candidate is far too long", "short");
    assert_eq!(
        engine.evaluate(&input),
        Err(ScoringError::InputTooLarge {
            field: "candidate_answer",
            limit: 10,
        })
    );
}

#[test]
fn result_serializes_with_public_field_names() {
    let result = evaluate(&engine(), "q", "an answer", "the answer", Category::General);
    let value = serde_json::to_value(&result).expect("serializes");
    for key in ["score", "details", "weights", "method_scores", "metrics", "trace"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["category"], "general");
    assert_eq!(result.weights_used.len(), 16);
}
