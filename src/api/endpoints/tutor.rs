//! Tutor operation endpoint.
//!
//! Every operation route shares this handler; the router binds the
//! `TutorOperation` per route. Flow: parse body → render template →
//! one gateway call → generated text as a JSON string.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, TopicRequest};
use crate::templates::TutorOperation;

/// `POST /<operation>` — generate study material for a topic.
pub async fn generate(
    operation: TutorOperation,
    ctx: ApiContext,
    body: Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<String>, ApiError> {
    let Json(req) = body?;

    // Rejected here, before any upstream call.
    let prompt = operation.render(&req.topic, ctx.max_topic_chars)?;

    tracing::info!(
        %operation,
        topic_chars = req.topic.chars().count(),
        "Generating study material"
    );

    let text = ctx.gateway.complete_prompt(&prompt).await?;
    Ok(Json(text))
}
