//! AI query adapter
//!
//! The playback core only ever sees a validated `ProblemTrace` or a
//! `QueryError`. Everything between the prompt and that result (HTTP,
//! response envelopes, locating the JSON inside model prose, validation)
//! is confined to this module.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod extract;
mod gemini;
mod prompt;
mod samples;

pub use extract::{extract_json_object, parse_trace_response};
pub use gemini::GeminiClient;
pub use prompt::build_visualization_prompt;
pub use samples::{normalize_query, SampleLibrary};

use async_trait::async_trait;
use thiserror::Error;

use crate::trace::{ProblemTrace, TraceError};

/// Failures of a visualization request
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Model response contained no text")]
    EmptyResponse,

    #[error("Model response contained no JSON object")]
    NoJsonObject,

    #[error("Invalid visualization format: {0}")]
    InvalidTrace(#[from] TraceError),

    #[error("No API key configured (set {0})")]
    MissingApiKey(String),
}

/// Source of traces for a prompt
#[async_trait]
pub trait TraceGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the validated trace it describes
    async fn generate(&self, prompt: &str) -> Result<ProblemTrace, QueryError>;

    /// Send `prompt` and return the model's free-text answer
    async fn complete(&self, prompt: &str) -> Result<String, QueryError>;
}
