use super::{send_json, snippet, BackendError, VisionBackend};
use crate::{config::Config, prompt};
use anyhow::Result;
use base64::Engine as _;
use reqwest::blocking::Client;
use tracing::debug;

/// Primary backend: Gemini `generateContent`.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    temperature: f64,
    max_output_tokens: u32,
}

impl GeminiBackend {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self> {
        let client = super::build_client(cfg)?;
        Ok(Self::with_client(cfg, api_key, client))
    }

    pub fn with_client(cfg: &Config, api_key: String, client: Client) -> Self {
        Self {
            client,
            base_url: cfg.providers.primary.base_url.clone(),
            api_key,
            temperature: cfg.providers.primary.temperature,
            max_output_tokens: cfg.providers.primary.max_output_tokens,
        }
    }
}

impl VisionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn evaluate(&self, image: &[u8], model: &str) -> Result<String, BackendError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        let payload = serde_json::json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": prompt::IMAGE_MIME, "data": data } },
                    { "text": prompt::EVAL_PROMPT }
                ]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens
            }
        });

        debug!(model, image_bytes = image.len(), "gemini generateContent");
        let request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload);
        let body = send_json(self.name(), model, request)?;

        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                BackendError::Protocol(format!(
                    "unexpected gemini response structure: {}",
                    snippet(&body.to_string())
                ))
            })?;

        parts
            .iter()
            .find_map(|p| {
                p.get("text")
                    .and_then(|t| t.as_str())
                    .filter(|s| !s.is_empty())
            })
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::Protocol(format!(
                    "no text part in gemini response: {}",
                    snippet(&body.to_string())
                ))
            })
    }
}
