use std::sync::Arc;
use std::time::Instant;

use super::{CompletionClient, CompletionParams, CompletionRequest, UpstreamServiceError};
use crate::config::TutorConfig;
use crate::templates::RenderedPrompt;

/// Single entry point for model calls. Cheap to share behind an `Arc`;
/// holds no per-request state.
pub struct CompletionGateway {
    client: Arc<dyn CompletionClient>,
    params: CompletionParams,
}

impl CompletionGateway {
    pub fn new(client: Arc<dyn CompletionClient>, params: CompletionParams) -> Self {
        Self { client, params }
    }

    /// Gateway with the model and temperature from `config`.
    pub fn from_config(client: Arc<dyn CompletionClient>, config: &TutorConfig) -> Self {
        Self::new(
            client,
            CompletionParams {
                model: config.model.clone(),
                temperature: config.temperature,
            },
        )
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    /// Send one system + user exchange and return the generated text as-is.
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, UpstreamServiceError> {
        let request = CompletionRequest {
            model: &self.params.model,
            temperature: self.params.temperature,
            system,
            prompt,
        };

        let started = Instant::now();
        let result = self.client.complete(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => tracing::debug!(
                model = %self.params.model,
                elapsed_ms,
                response_chars = text.chars().count(),
                "Completion succeeded"
            ),
            Err(e) => tracing::warn!(
                model = %self.params.model,
                elapsed_ms,
                kind = e.kind(),
                error = %e,
                "Completion failed"
            ),
        }

        result
    }

    /// Convenience wrapper for a rendered template.
    pub async fn complete_prompt(
        &self,
        prompt: &RenderedPrompt,
    ) -> Result<String, UpstreamServiceError> {
        self.complete(prompt.system, &prompt.user).await
    }
}
