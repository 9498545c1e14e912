//! Gemini `generateContent` client
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{parse_trace_response, QueryError, TraceGenerator};
use crate::config::QueryConfig;
use crate::trace::ProblemTrace;

/// Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.3,
        })
    }

    /// Client configured from `config`, reading the API key from its environment variable
    pub fn from_config(config: &QueryConfig) -> Result<Self, QueryError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| QueryError::MissingApiKey(config.api_key_env.clone()))?;
        let mut client = Self::new(
            &config.endpoint,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )?;
        client.temperature = config.temperature;
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Low-temperature JSON output for traces
    fn trace(temperature: f32) -> Self {
        Self {
            response_mime_type: Some("application/json"),
            temperature,
            top_p: 0.9,
            top_k: 20,
            max_output_tokens: None,
        }
    }

    /// Conversational tutor answers
    fn chat() -> Self {
        Self {
            response_mime_type: None,
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: Some(2048),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait]
impl TraceGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<ProblemTrace, QueryError> {
        let text = self
            .send(prompt, GenerationConfig::trace(self.temperature))
            .await?;
        parse_trace_response(&text)
    }

    async fn complete(&self, prompt: &str) -> Result<String, QueryError> {
        self.send(prompt, GenerationConfig::chat()).await
    }
}

impl GeminiClient {
    /// Post one prompt and return the first candidate's text
    async fn send(
        &self,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> Result<String, QueryError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            warn!("Gemini request failed ({status}): {message}");
            return Err(QueryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        debug!(
            "Gemini {} responded in {} ms",
            self.model,
            start.elapsed().as_millis()
        );

        body.into_text().ok_or(QueryError::EmptyResponse)
    }
}
