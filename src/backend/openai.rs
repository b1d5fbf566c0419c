use super::{send_json, snippet, BackendError, VisionBackend};
use crate::{config::Config, prompt};
use anyhow::Result;
use base64::Engine as _;
use reqwest::blocking::Client;
use tracing::debug;

/// Secondary backend: OpenAI chat completions with an inline image part.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self> {
        let client = super::build_client(cfg)?;
        Ok(Self::with_client(cfg, api_key, client))
    }

    pub fn with_client(cfg: &Config, api_key: String, client: Client) -> Self {
        Self {
            client,
            base_url: cfg.providers.secondary.base_url.clone(),
            api_key,
            temperature: cfg.providers.secondary.temperature,
            max_tokens: cfg.providers.secondary.max_output_tokens,
        }
    }
}

impl VisionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn evaluate(&self, image: &[u8], model: &str) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let data_url = format!(
            "data:{};base64,{}",
            prompt::IMAGE_MIME,
            base64::engine::general_purpose::STANDARD.encode(image)
        );
        let payload = serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "image_url", "image_url": { "url": data_url } },
                    { "type": "text", "text": prompt::EVAL_PROMPT }
                ]
            }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });

        debug!(model, image_bytes = image.len(), "openai chat/completions");
        let request = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload);
        let body = send_json(self.name(), model, request)?;

        body.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::Protocol(format!(
                    "unexpected openai response structure: {}",
                    snippet(&body.to_string())
                ))
            })
    }
}
