//! Text-generation service: trait, candidate-model chain and Gemini client

use crate::config::AdviceConfig;
use crate::error::{GenerationAttempt, JobScoutError, Result};
use anyhow::Context;
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prose returned by a generation service and the model that wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub model: String,
    pub text: String,
}

/// Prompt in, prose out. Implementations report every failure as an error,
/// including empty output.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<Generation>;
}

/// Call `call` for each candidate model in order and return the first
/// non-empty answer. Each failure is kept as a structured attempt.
pub fn try_candidates<F>(candidates: &[String], mut call: F) -> Result<Generation>
where
    F: FnMut(&str) -> anyhow::Result<String>,
{
    let mut attempts = Vec::new();

    for model in candidates {
        match call(model) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Successfully used model: {}", model);
                return Ok(Generation {
                    model: model.clone(),
                    text,
                });
            }
            Ok(_) => {
                warn!("Model {} returned an empty response", model);
                attempts.push(GenerationAttempt {
                    model: model.clone(),
                    error: "empty response".to_string(),
                });
            }
            Err(e) => {
                warn!("Model {} failed: {:#}", model, e);
                attempts.push(GenerationAttempt {
                    model: model.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    Err(JobScoutError::GenerationServiceUnavailable { attempts })
}

/// Gemini `generateContent` client that walks the configured model list.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    candidate_models: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &AdviceConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(JobScoutError::Configuration(
                "provider_api_key is not set".to_string(),
            ));
        }
        if config.candidate_models.is_empty() {
            return Err(JobScoutError::Configuration(
                "advice.candidate_models is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobScoutError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            candidate_models: config.candidate_models.clone(),
        })
    }

    pub fn candidate_models(&self) -> &[String] {
        &self.candidate_models
    }

    fn generate_with_model(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        let model = model.trim_start_matches("models/");
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("Sending prompt of {} chars to {}", prompt.len(), model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Gemini returned status {}: {}", status, body);
        }

        let parsed: GenerateResponse = response
            .json()
            .context("Failed to parse Gemini response")?;
        Ok(parsed.into_text())
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Generation> {
        try_candidates(&self.candidate_models, |model| {
            self.generate_with_model(model, prompt)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_first_success_short_circuits() {
        let mut called = Vec::new();
        let result = try_candidates(&models(&["a", "b", "c"]), |model| {
            called.push(model.to_string());
            match model {
                "a" => anyhow::bail!("model not found"),
                "b" => Ok("advice".to_string()),
                _ => Ok("unreachable".to_string()),
            }
        })
        .unwrap();

        assert_eq!(result.model, "b");
        assert_eq!(result.text, "advice");
        assert_eq!(called, vec!["a", "b"]);
    }

    #[test]
    fn test_all_failures_are_recorded() {
        let result = try_candidates(&models(&["a", "b"]), |model| match model {
            "a" => anyhow::bail!("quota exceeded"),
            _ => Ok("   ".to_string()),
        });

        match result {
            Err(JobScoutError::GenerationServiceUnavailable { attempts }) => {
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].model, "a");
                assert!(attempts[0].error.contains("quota exceeded"));
                assert_eq!(attempts[1].error, "empty response");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_candidates_is_unavailable() {
        let result = try_candidates(&[], |_| Ok("text".to_string()));
        assert!(matches!(
            result,
            Err(JobScoutError::GenerationServiceUnavailable { attempts }) if attempts.is_empty()
        ));
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(matches!(
            GeminiClient::new("  ", &AdviceConfig::default()),
            Err(JobScoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_response_text_extraction() {
        let payload = r#"{"candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.into_text(), "Hello, world");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.into_text(), "");
    }

    #[test]
    fn test_unreachable_service_fails_every_candidate() {
        let config = AdviceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            candidate_models: models(&["m1", "m2"]),
            timeout_secs: 1,
        };
        let client = GeminiClient::new("key", &config).unwrap();

        match client.generate("prompt") {
            Err(JobScoutError::GenerationServiceUnavailable { attempts }) => {
                assert_eq!(attempts.len(), 2)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
