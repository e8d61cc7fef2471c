pub mod api;
pub mod completion;
pub mod config;
pub mod templates;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::completion::{CompletionGateway, OpenAiClient, UpstreamServiceError};
use crate::config::{ConfigError, TutorConfig};

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to create completion client: {0}")]
    Client(#[from] UpstreamServiceError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Load configuration, serve the API, and run until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // .env must be loaded before the log filter is read
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }

    let config = TutorConfig::from_env().inspect_err(|e| tracing::error!("{e}"))?;
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; completion calls will be rejected upstream");
    }
    tracing::info!(
        model = %config.model,
        temperature = config.temperature,
        base_url = %config.base_url,
        allowed_origin = %config.allowed_origin,
        "Configuration loaded"
    );

    let client = Arc::new(OpenAiClient::from_config(&config)?);
    let gateway = Arc::new(CompletionGateway::from_config(client, &config));
    let app = api::tutor_router(api::ApiContext::new(gateway, &config))?;

    let mut server = api::start_tutor_server(app, config.socket_addr()).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    let signal = tokio::signal::ctrl_c().await.map_err(StartupError::Signal);
    server.shutdown();
    server.stopped().await;
    signal
}
