//! Mock completion client for tests — configurable response, records calls.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, CompletionRequest, UpstreamServiceError};

enum Behavior {
    Respond(String),
    /// Reply with the user prompt, so callers can check which prompt was sent.
    Echo,
    Status { status: u16, message: String },
    Unreachable,
}

/// One recorded call: (model, temperature, system, prompt).
pub type RecordedCall = (String, f32, String, String);

pub struct MockCompletionClient {
    behavior: Behavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn new(response: &str) -> Self {
        Self::with_behavior(Behavior::Respond(response.to_string()))
    }

    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn failing_status(status: u16, message: &str) -> Self {
        Self::with_behavior(Behavior::Status {
            status,
            message: message.to_string(),
        })
    }

    pub fn unreachable() -> Self {
        Self::with_behavior(Behavior::Unreachable)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<String, UpstreamServiceError> {
        self.calls.lock().unwrap().push((
            request.model.to_string(),
            request.temperature,
            request.system.to_string(),
            request.prompt.to_string(),
        ));
        // Yield so concurrent callers interleave.
        tokio::task::yield_now().await;

        match &self.behavior {
            Behavior::Respond(text) => Ok(text.clone()),
            Behavior::Echo => Ok(request.prompt.to_string()),
            Behavior::Status { status, message } => Err(UpstreamServiceError::Status {
                status: *status,
                message: message.clone(),
            }),
            Behavior::Unreachable => Err(UpstreamServiceError::Connection {
                url: "http://127.0.0.1:9/v1".into(),
                cause: "error sending request: tcp connect error: Connection refused (os error 111)"
                    .into(),
            }),
        }
    }
}
