//! OpenAI-compatible completions backend.
//!
//! Talks to the legacy `/completions` endpoint, which takes a single prompt
//! string and returns a list of text choices.

use super::{Completer, GatewayError};
use crate::config::CompletionConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Completion backend for the OpenAI API and compatible servers.
pub struct OpenAiCompleter {
    pub model: String,
    api_base: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompleter {
    /// Create a new backend from config.
    pub fn new(api_key: String, config: &CompletionConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Use a different model for every request from this backend.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.api_base)
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
        };

        debug!(
            "Sending completion request (model: {}, prompt: {} bytes, max_tokens: {})",
            self.model,
            prompt.len(),
            max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(GatewayError::NoChoices)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
