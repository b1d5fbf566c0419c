pub mod gemini;
pub mod openai;

use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    PrimaryVision,
    SecondaryVision,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::PrimaryVision => f.write_str("primary"),
            BackendKind::SecondaryVision => f.write_str("secondary"),
        }
    }
}

/// Closed set of adapter failures. Only `ModelUnavailable` is recoverable,
/// and only while searching the primary candidate list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("model {model} not available (HTTP {status})")]
    ModelUnavailable { model: String, status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, BackendError::ModelUnavailable { .. })
    }
}

/// One vision service. `evaluate` sends the image plus the fixed prompt and
/// returns the single text field of the response envelope.
pub trait VisionBackend {
    fn name(&self) -> &str;
    fn evaluate(&self, image: &[u8], model: &str) -> Result<String, BackendError>;
}

const MODEL_UNAVAILABLE_MARKERS: [&str; 4] =
    ["not found", "model_not_found", "not supported", "does not exist"];

/// Maps a non-success HTTP reply onto the closed error set.
pub fn classify_failure(name: &str, model: &str, status: u16, body: &str) -> BackendError {
    let lower = body.to_lowercase();
    if status == 404 || MODEL_UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        return BackendError::ModelUnavailable {
            model: model.to_string(),
            status,
        };
    }
    BackendError::Transport(format!("{name} returned HTTP {status}: {}", snippet(body)))
}

pub fn build_client(cfg: &Config) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(cfg.http.connect_timeout_seconds))
        .timeout(Duration::from_secs(cfg.http.request_timeout_seconds))
        .build()
        .with_context(|| "building HTTP client")
}

/// Sends a prepared request and returns the decoded JSON body of a 2xx reply.
pub(crate) fn send_json(
    name: &str,
    model: &str,
    request: reqwest::blocking::RequestBuilder,
) -> Result<serde_json::Value, BackendError> {
    let resp = request.send().map_err(|e| {
        if e.is_timeout() {
            BackendError::Transport(format!("{name} request timed out: {e}"))
        } else {
            BackendError::Transport(format!("{name} request failed: {e}"))
        }
    })?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| BackendError::Transport(format!("{name} body read failed: {e}")))?;

    if !status.is_success() {
        return Err(classify_failure(name, model, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        BackendError::Protocol(format!("{name} returned non-JSON body ({e}): {}", snippet(&body)))
    })
}

pub(crate) fn snippet(s: &str) -> String {
    const MAX: usize = 500;
    if s.len() <= MAX {
        return s.to_string();
    }
    let mut end = MAX;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
