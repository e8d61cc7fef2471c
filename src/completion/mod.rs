//! Completion gateway: one outbound chat-completion call per request.
//!
//! The gateway owns the fixed model parameters and a `CompletionClient`.
//! It never retries and never post-processes the generated text. Failures
//! come back as `UpstreamServiceError`, which knows nothing about HTTP
//! status codes; the API layer decides how to present them.

pub mod gateway;
#[cfg(test)]
pub mod mock;
pub mod openai;

use async_trait::async_trait;

pub use gateway::CompletionGateway;
pub use openai::OpenAiClient;

/// Fixed sampling parameters applied to every call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
}

/// A single system + user message exchange.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub system: &'a str,
    pub prompt: &'a str,
}

/// Any failure from the external model call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamServiceError {
    #[error("Connection error: could not reach {url}: {cause}")]
    Connection { url: String, cause: String },

    #[error("Request timed out: {cause}")]
    Timeout { cause: String },

    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response contained no message content")]
    EmptyCompletion,
}

impl UpstreamServiceError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::Timeout { .. } => "timeout",
            Self::Status { status: 401 | 403, .. } => "authentication",
            Self::Status { status: 429, .. } => "rate_limited",
            Self::Status { .. } => "status",
            Self::HttpClient(_) => "http_client",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyCompletion => "empty_completion",
        }
    }
}

/// Render an error and its `source()` chain as `outer: inner: root`.
///
/// reqwest's own `Display` stops at "error sending request for url (..)";
/// the refused/reset/DNS detail only lives further down the chain.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let inner_text = inner.to_string();
        if !text.contains(&inner_text) {
            text.push_str(": ");
            text.push_str(&inner_text);
        }
        source = inner.source();
    }
    text
}

/// Chat-completion backend abstraction (allows mocking).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<String, UpstreamServiceError>;
}
