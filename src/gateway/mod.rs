//! Completion gateway.
//!
//! One request per call, first choice only. Failures from the service are
//! handed back unchanged; nothing here retries or classifies them.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiCompleter;

/// Failure of a single completion call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("error, status code: {status}, message: {message}")]
    Api { status: u16, message: String },

    /// The service answered successfully but without any choices.
    #[error("completion service returned no choices")]
    NoChoices,
}

/// Something that can turn a prompt into a completion.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Request a completion of at most `max_tokens` tokens for `prompt`.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError>;
}

#[async_trait]
impl<C: Completer + ?Sized> Completer for &C {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        (**self).complete(prompt, max_tokens).await
    }
}
