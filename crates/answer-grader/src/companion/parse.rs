use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use super::{AssessmentSource, CompanionAssessment, HallucinationFlags};

const DEFAULT_OVERALL: f64 = 75.0;

const DEFAULT_DETAILS: &[(&str, f64)] = &[
    ("similarity", 70.0),
    ("accuracy", 70.0),
    ("completeness", 70.0),
    ("relevance", 70.0),
    ("clarity", 70.0),
    ("readability", 70.0),
    ("toxicity", 5.0),
    ("bias", 3.0),
    ("sentiment", 50.0),
    ("intent_match", 60.0),
    ("factual_consistency", 65.0),
];

const EXCERPT_CHARS: usize = 200;

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid json block regex"))
}

fn score_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+)(?:/100|\s*out\s*of\s*100|\s*%)").expect("valid score regex")
    })
}

/// Turn raw model text into an assessment; never fails.
pub fn parse_response(text: &str) -> CompanionAssessment {
    if let Some(assessment) = parse_json(text) {
        return assessment;
    }
    warn!("companion reply was not a JSON object, trying partial parse");
    if let Some(assessment) = parse_partial(text) {
        return assessment;
    }
    warn!("companion reply had no recognizable score, using fallback");
    fallback()
}

fn parse_json(text: &str) -> Option<CompanionAssessment> {
    let block = json_block_re().find(text)?;
    let value: Value = serde_json::from_str(block.as_str()).ok()?;
    let object = value.as_object()?;

    let number = |key: &str, default: f64| {
        object
            .get(key)
            .and_then(Value::as_f64)
            .map(|value| value.clamp(0.0, 100.0))
            .unwrap_or(default)
    };

    let details = DEFAULT_DETAILS
        .iter()
        .map(|&(name, default)| (name.to_string(), number(name, default)))
        .collect();
    let explanation = object
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or("evaluation completed");

    Some(CompanionAssessment {
        score: number("overall_score", DEFAULT_OVERALL),
        details,
        explanation: format!("Gemini analysis: {explanation}"),
        method_scores: method_scores(object),
        strengths: typed_field(object, "strengths").unwrap_or_default(),
        weaknesses: typed_field(object, "weaknesses").unwrap_or_default(),
        top_k_evidence: typed_field(object, "top_k_evidence").unwrap_or_default(),
        hallucination_flags: typed_field::<HallucinationFlags>(object, "hallucination_flags")
            .unwrap_or_default(),
        source: AssessmentSource::Model,
    })
}

fn method_scores(object: &Map<String, Value>) -> BTreeMap<String, f64> {
    object
        .get("method_scores")
        .and_then(Value::as_object)
        .map(|scores| {
            scores
                .iter()
                .filter_map(|(name, value)| value.as_f64().map(|score| (name.clone(), score)))
                .collect()
        })
        .unwrap_or_default()
}

fn typed_field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    object
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

fn parse_partial(text: &str) -> Option<CompanionAssessment> {
    let captures = score_mention_re().captures(text)?;
    let score = captures[1].parse::<f64>().ok()?.min(100.0);
    let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();

    let details = BTreeMap::from([
        ("accuracy".to_string(), score),
        ("completeness".to_string(), (score - 5.0).max(0.0)),
        ("relevance".to_string(), (score - 3.0).max(0.0)),
        ("clarity".to_string(), score),
    ]);

    Some(CompanionAssessment {
        score,
        details,
        explanation: format!("Gemini analysis: {excerpt}..."),
        method_scores: BTreeMap::new(),
        strengths: vec!["AI-powered evaluation".to_string()],
        weaknesses: vec!["Reply was not structured JSON".to_string()],
        top_k_evidence: Vec::new(),
        hallucination_flags: HallucinationFlags::default(),
        source: AssessmentSource::PartialParse,
    })
}

fn fallback() -> CompanionAssessment {
    let details = BTreeMap::from([
        ("accuracy".to_string(), 75.0),
        ("completeness".to_string(), 70.0),
        ("relevance".to_string(), 80.0),
        ("clarity".to_string(), 75.0),
    ]);
    CompanionAssessment {
        score: DEFAULT_OVERALL,
        details,
        explanation: "Fallback analysis: evaluation completed with standard metrics".to_string(),
        method_scores: BTreeMap::new(),
        strengths: vec!["Reasonable content structure".to_string()],
        weaknesses: vec!["Could benefit from more detail".to_string()],
        top_k_evidence: Vec::new(),
        hallucination_flags: HallucinationFlags::default(),
        source: AssessmentSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_inside_prose_is_extracted() {
        let reply = r#"Here is my grade:
```json
{"overall_score": 88, "accuracy": 91, "toxicity": 0,
 "method_scores": {"keyword_overlap": 0.8},
 "strengths": ["precise"],
 "top_k_evidence": [{"source": "docs", "title": "Guide", "snippet": "...", "score": 0.9}],
 "hallucination_flags": {"is_hallucinated": true, "reasons": ["made up flag"]},
 "explanation": "solid answer"}
```"#;
        let assessment = parse_response(reply);
        assert_eq!(assessment.source, AssessmentSource::Model);
        assert_eq!(assessment.score, 88.0);
        assert_eq!(assessment.detail("accuracy"), Some(91.0));
        assert_eq!(assessment.detail("toxicity"), Some(0.0));
        assert_eq!(assessment.method_scores["keyword_overlap"], 0.8);
        assert_eq!(assessment.strengths, vec!["precise".to_string()]);
        assert_eq!(assessment.top_k_evidence.len(), 1);
        assert_eq!(assessment.top_k_evidence[0].url, None);
        assert!(assessment.hallucination_flags.is_hallucinated);
        assert_eq!(assessment.explanation, "Gemini analysis: solid answer");
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let assessment = parse_response("{}");
        assert_eq!(assessment.source, AssessmentSource::Model);
        assert_eq!(assessment.score, 75.0);
        for &(name, default) in DEFAULT_DETAILS {
            assert_eq!(assessment.detail(name), Some(default), "{name}");
        }
        assert!(assessment.method_scores.is_empty());
        assert!(!assessment.hallucination_flags.is_hallucinated);
    }

    #[test]
    fn out_of_range_numbers_are_clamped() {
        let assessment = parse_response(r#"{"overall_score": 140, "bias": -3}"#);
        assert_eq!(assessment.score, 100.0);
        assert_eq!(assessment.detail("bias"), Some(0.0));
    }

    #[test]
    fn score_mentions_drive_partial_parse() {
        for (reply, expected) in [
            ("I'd rate this 82/100 overall.", 82.0),
            ("Score: 64 out of 100", 64.0),
            ("{not json} roughly 90% correct", 90.0),
        ] {
            let assessment = parse_response(reply);
            assert_eq!(assessment.source, AssessmentSource::PartialParse, "{reply}");
            assert_eq!(assessment.score, expected);
            assert_eq!(assessment.detail("completeness"), Some(expected - 5.0));
            assert_eq!(assessment.detail("relevance"), Some(expected - 3.0));
            assert!(assessment.explanation.ends_with("..."));
        }
    }

    #[test]
    fn unrecognizable_reply_uses_fixed_fallback() {
        let assessment = parse_response("The answer seems fine to me.");
        assert_eq!(assessment.source, AssessmentSource::Fallback);
        assert_eq!(assessment.score, 75.0);
        assert_eq!(assessment.detail("relevance"), Some(80.0));
    }
}
