//! Shared types for the tutor HTTP layer.

use std::sync::Arc;

use serde::Deserialize;

use crate::completion::CompletionGateway;
use crate::config::TutorConfig;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the tutor router
// ═══════════════════════════════════════════════════════════

/// Shared, read-only context for all routes. Built once at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub gateway: Arc<CompletionGateway>,
    /// `None` leaves topic length unchecked.
    pub max_topic_chars: Option<usize>,
    pub allowed_origin: String,
}

impl ApiContext {
    pub fn new(gateway: Arc<CompletionGateway>, config: &TutorConfig) -> Self {
        Self {
            gateway,
            max_topic_chars: config.max_topic_chars,
            allowed_origin: config.allowed_origin.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════

/// Body accepted by every tutor operation: `{"topic": "..."}`.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}
