//! Tutor API router.
//!
//! One `POST` route per `TutorOperation` plus `GET /health`.
//!
//! Layers (outermost → innermost): CORS → audit logger → handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::{ApiContext, TopicRequest};
use crate::config::ConfigError;
use crate::templates::TutorOperation;

/// Build the tutor API router.
///
/// Fails only if the configured CORS origin is not a valid header value.
pub fn tutor_router(ctx: ApiContext) -> Result<Router, ConfigError> {
    let cors = cors_layer(&ctx.allowed_origin)?;

    let mut router: Router<ApiContext> =
        Router::new().route("/health", get(endpoints::health::check));

    for &operation in TutorOperation::all() {
        router = router.route(
            &operation.route(),
            post(
                move |State(ctx): State<ApiContext>,
                      body: Result<Json<TopicRequest>, JsonRejection>| async move {
                    endpoints::tutor::generate(operation, ctx, body).await
                },
            ),
        );
    }

    Ok(router
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors))
}

/// CORS policy: only `origin` may call the API; any method and header.
fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
        var: "MEDTUTOR_ALLOWED_ORIGIN",
        value: origin.to_string(),
        reason: e.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(Any)
        .allow_headers(Any))
}
