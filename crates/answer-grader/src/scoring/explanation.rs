use std::collections::BTreeMap;

use super::domain::{AppliedGuardrail, Category, Dimension};
use super::similarity::MethodScores;

/// Inputs to the summary; everything is already computed.
pub struct ExplanationInput<'a> {
    pub category: Category,
    pub dimensions: &'a BTreeMap<Dimension, f64>,
    pub methods: &'a MethodScores,
    pub entity_model_available: bool,
    pub guardrails: &'a [AppliedGuardrail],
}

/// Deterministic, threshold-bucketed summary of an evaluation.
pub fn explain(input: &ExplanationInput<'_>) -> String {
    let value = |dimension: Dimension| input.dimensions.get(&dimension).copied().unwrap_or(0.0);
    let mut parts: Vec<String> = Vec::new();

    let similarity = value(Dimension::Similarity);
    parts.push(
        match similarity {
            s if s >= 80.0 => "Excellent semantic similarity",
            s if s >= 60.0 => "Good semantic similarity",
            s if s >= 40.0 => "Moderate semantic similarity",
            _ => "Low semantic similarity",
        }
        .to_string(),
    );

    let methods: Vec<&str> = input.methods.methods().map(|m| m.description()).collect();
    if !methods.is_empty() {
        parts.push(format!("analyzed using {}", methods.join(", ")));
    }

    parts.push(
        match value(Dimension::Accuracy) {
            a if a >= 70.0 => "strong lexical overlap",
            a if a >= 50.0 => "moderate lexical overlap",
            _ => "limited lexical overlap",
        }
        .to_string(),
    );

    parts.push(
        match value(Dimension::Completeness) {
            c if c >= 80.0 => "comprehensive content coverage",
            c if c >= 60.0 => "adequate content coverage",
            _ => "incomplete content coverage",
        }
        .to_string(),
    );

    parts.push(
        match value(Dimension::Relevance) {
            r if r >= 80.0 => "highly relevant to question",
            r if r >= 60.0 => "moderately relevant",
            _ => "limited relevance",
        }
        .to_string(),
    );

    if input.entity_model_available {
        parts.push(
            match value(Dimension::EntityAgreement) {
                e if e >= 80.0 => "named entities agree",
                e if e >= 50.0 => "partial named-entity agreement",
                _ => "named entities disagree",
            }
            .to_string(),
        );
    }

    match input.category {
        Category::Safety => parts.push(format!(
            "safety category: refusal compliance {:.0}",
            value(Dimension::RefusalCompliance)
        )),
        Category::Technical => parts.push(format!(
            "technical category: factual consistency {:.0}",
            value(Dimension::FactualConsistency)
        )),
        Category::Creative => parts.push(format!(
            "creative category: clarity {:.0}",
            value(Dimension::Clarity)
        )),
        Category::General => {}
    }

    for guardrail in input.guardrails {
        parts.push(format!(
            "capped at {:.0} by {}",
            guardrail.cap, guardrail.rule
        ));
    }

    let mut summary = parts.join(", ");
    summary.push('.');
    summary
}
