//! OpenAI speech API backend.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{TtsBackend, TtsOptions};
use crate::config::mask_api_keys;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Backend for the OpenAI `/audio/speech` endpoint.
pub struct OpenAiSpeechBackend {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAiSpeechBackend {
    /// Create a new backend with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            client: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl TtsBackend for OpenAiSpeechBackend {
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<Vec<u8>> {
        let url = format!("{}/audio/speech", self.base_url);
        let request = SpeechRequest {
            model: &options.model,
            voice: &options.voice,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!("speech request failed: {}", mask_api_keys(&e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    parsed.error.message
                } else {
                    error_text
                };
            // API errors can echo the key back; never log it verbatim.
            anyhow::bail!(
                "speech API error (HTTP {}): {}",
                status.as_u16(),
                mask_api_keys(&message)
            );
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}
