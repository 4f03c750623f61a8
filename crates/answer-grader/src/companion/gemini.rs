use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::mock::DeterministicEvaluator;
use super::parse::parse_response;
use super::prompt::evaluation_prompt;
use super::{CompanionAssessment, CompanionError, CompanionEvaluator};
use crate::config::CompanionConfig;

/// Gemini `generateContent` client with a deterministic fallback.
pub struct GeminiEvaluator {
    api_key: Option<String>,
    model: String,
    base_url: String,
    http_client: Client,
    fallback: DeterministicEvaluator,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiEvaluator {
    pub fn from_config(config: &CompanionConfig) -> Result<Self, CompanionError> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            fallback: DeterministicEvaluator,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn request_text(&self, api_key: &str, prompt: String) -> Result<String, CompanionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let start = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&raw) {
                Ok(error) => error.error.message,
                Err(_) => raw,
            };
            return Err(CompanionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "companion model replied"
        );

        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(CompanionError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl CompanionEvaluator for GeminiEvaluator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    async fn evaluate(
        &self,
        question: &str,
        candidate: &str,
        reference: &str,
    ) -> Result<CompanionAssessment, CompanionError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(self.fallback.assess(question, candidate, reference));
        };

        let prompt = evaluation_prompt(question, candidate, reference);
        match self.request_text(api_key, prompt).await {
            Ok(text) => Ok(parse_response(&text)),
            Err(error) => {
                warn!(
                    %error,
                    model = %self.model,
                    "companion request failed, using deterministic assessment"
                );
                Ok(self.fallback.assess(question, candidate, reference))
            }
        }
    }
}

impl std::fmt::Debug for GeminiEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEvaluator")
            .field("live", &self.is_live())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
