//! API error types with `{"detail": ...}` JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::completion::UpstreamServiceError;
use crate::templates::TemplateError;

/// Error response body, the shape the web client already parses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidTopic(#[from] TemplateError),
    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("OpenAI API Error: {0}")]
    Upstream(#[from] UpstreamServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidTopic(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::InvalidTopic(e) => e.to_string(),
            ApiError::InvalidBody(rejection) => rejection.body_text(),
            ApiError::Upstream(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Upstream completion failed");
                self.to_string()
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn detail_of(response: Response) -> String {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["detail"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn upstream_returns_500_with_prefixed_detail() {
        let err = ApiError::Upstream(UpstreamServiceError::Status {
            status: 401,
            message: "Incorrect API key provided".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            detail_of(response).await,
            "OpenAI API Error: Upstream returned status 401: Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn connection_failure_detail_names_upstream_and_cause() {
        let err: ApiError = UpstreamServiceError::Connection {
            url: "https://api.openai.com/v1".into(),
            cause: "dns error: failed to lookup address information".into(),
        }
        .into();
        let detail = detail_of(err.into_response()).await;
        assert!(detail.starts_with("OpenAI API Error: "));
        assert!(detail.contains("https://api.openai.com/v1"));
        assert!(detail.ends_with("dns error: failed to lookup address information"));
    }

    #[tokio::test]
    async fn timeout_detail_keeps_cause() {
        let err: ApiError = UpstreamServiceError::Timeout {
            cause: "operation timed out".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            detail_of(response).await,
            "OpenAI API Error: Request timed out: operation timed out"
        );
    }

    #[tokio::test]
    async fn empty_topic_returns_422() {
        let response = ApiError::from(TemplateError::EmptyTopic).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail_of(response).await, "Topic must not be empty");
    }

    #[tokio::test]
    async fn topic_too_long_returns_422() {
        let err = TemplateError::TopicTooLong { max: 10, actual: 12 };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
