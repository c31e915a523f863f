//! HTTP completion backend
//!
//! Posts assembled prompt context to an Ollama-style `/api/generate`
//! endpoint and returns the completion text. The endpoint, model name, and
//! timeout all come from the `[generation]` config table.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::LlmBackend;
use crate::config::GenerationConfig;

/// Completion request body (Ollama generate API shape)
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Completion response body
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Generation backend talking to an external completion endpoint.
pub struct HttpBackend {
    http_client: reqwest::Client,
    url: String,
    model: String,
}

impl HttpBackend {
    /// Build a backend from the generation config.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build generation HTTP client")?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LlmBackend for HttpBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Generation request timed out")
                } else if e.is_connect() {
                    anyhow!("Cannot connect to generation endpoint at {}", self.url)
                } else {
                    anyhow!("Failed to send generation request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Generation endpoint error {}: {}", status, body));
        }

        let completion: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generation response")?;

        if completion.response.trim().is_empty() {
            return Err(anyhow!("Generation endpoint returned an empty completion"));
        }

        Ok(completion.response)
    }

    fn backend_name(&self) -> &'static str {
        "http-completion"
    }
}
