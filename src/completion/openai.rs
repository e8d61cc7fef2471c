use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{error_chain, CompletionClient, CompletionRequest, UpstreamServiceError};
use crate::config::TutorConfig;

/// OpenAI Chat Completions HTTP client.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for `{base_url}/chat/completions`.
    ///
    /// `timeout_secs = None` keeps the transport default (no overall timeout).
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, UpstreamServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamServiceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &TutorConfig) -> Result<Self, UpstreamServiceError> {
        Self::new(&config.base_url, config.api_key.clone(), config.timeout_secs)
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Classify a transport failure, keeping the full cause chain.
    fn transport_error(&self, e: reqwest::Error) -> UpstreamServiceError {
        let cause = error_chain(&e);
        if e.is_connect() {
            UpstreamServiceError::Connection {
                url: self.base_url.clone(),
                cause,
            }
        } else if e.is_timeout() {
            UpstreamServiceError::Timeout { cause }
        } else {
            UpstreamServiceError::HttpClient(cause)
        }
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body from /chat/completions (only the fields we read)
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Error envelope returned by the API on non-2xx responses
#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull a human-readable message out of an error response body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("empty error response")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<String, UpstreamServiceError> {
        let body = ChatCompletionRequest {
            model: request.model,
            temperature: request.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
        };

        let mut builder = self.client.post(self.url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(UpstreamServiceError::Status {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| UpstreamServiceError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(UpstreamServiceError::EmptyCompletion)
    }
}
