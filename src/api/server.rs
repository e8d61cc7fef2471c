//! HTTP listener for the tutor routes.
//!
//! `start_tutor_server` binds first so address errors surface to the caller,
//! then hands the listener to a background task. The returned handle stops
//! the task through a oneshot channel.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Identity of one listener run, logged at startup and kept on the handle.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running server.
pub struct TutorServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TutorServer {
    /// Signal graceful shutdown. In-flight requests are allowed to finish.
    pub fn shutdown(&mut self) {
        let Some(tx) = self.shutdown_tx.take() else {
            return;
        };
        // The receiver is gone only if the serve task already exited.
        if tx.send(()).is_ok() {
            tracing::debug!(session_id = %self.session.session_id, "Stop requested");
        }
    }

    /// Wait until the serve task has exited.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!(
                session_id = %self.session.session_id,
                error = %e,
                "Serve task panicked or was cancelled"
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` and serve `app` in a background tokio task.
///
/// Port 0 binds an ephemeral port; the real one is in `session.port`.
pub async fn start_tutor_server(app: Router, addr: SocketAddr) -> Result<TutorServer, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(serve(listener, app, session.clone(), shutdown_rx));

    Ok(TutorServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Accept connections until `stop` fires (or its sender is dropped), then
/// let in-flight tutor requests finish before returning.
async fn serve(
    listener: TcpListener,
    app: Router,
    session: ServerSession,
    stop: oneshot::Receiver<()>,
) {
    tracing::info!(
        session_id = %session.session_id,
        addr = %session.server_addr,
        "Accepting tutor requests"
    );

    let session_id = session.session_id.clone();
    let drain = async move {
        let _ = stop.await;
        tracing::info!(
            %session_id,
            "No longer accepting requests; draining in-flight generations"
        );
    };

    match axum::serve(listener, app).with_graceful_shutdown(drain).await {
        Ok(()) => tracing::info!(session_id = %session.session_id, "Listener closed"),
        Err(e) => tracing::error!(
            session_id = %session.session_id,
            error = %e,
            "Listener failed"
        ),
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use crate::api::router::tutor_router;
    use crate::api::types::ApiContext;
    use crate::completion::mock::MockCompletionClient;
    use crate::completion::CompletionGateway;
    use crate::config::TutorConfig;

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_app(response: &str) -> Router {
        let config = TutorConfig::default();
        let gateway = Arc::new(CompletionGateway::from_config(
            Arc::new(MockCompletionClient::new(response)),
            &config,
        ));
        tutor_router(ApiContext::new(gateway, &config)).unwrap()
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_tutor_server(test_app("Hello"), localhost())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);
        assert!(!server.session.started_at.is_empty());

        let url = format!("http://127.0.0.1:{}/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn serves_operation_routes_over_http() {
        let mut server = start_tutor_server(test_app("Hello"), localhost())
            .await
            .expect("server should start");
        let port = server.session.port;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/step1-anki"))
            .json(&serde_json::json!({ "topic": "Hyperkalemia" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let text: String = resp.json().await.unwrap();
        assert_eq!(text, "Hello");

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let mut first = start_tutor_server(test_app(""), localhost()).await.unwrap();
        let taken: SocketAddr = first.session.server_addr.parse().unwrap();

        let err = start_tutor_server(test_app(""), taken).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));

        first.shutdown();
    }

    #[tokio::test]
    async fn listener_is_released_after_stop() {
        let mut server = start_tutor_server(test_app(""), localhost()).await.unwrap();
        let addr: SocketAddr = server.session.server_addr.parse().unwrap();
        assert_eq!(server.session.port, addr.port());

        server.shutdown();
        server.stopped().await;

        let err = reqwest::get(format!("http://{addr}/health")).await.unwrap_err();
        assert!(err.is_connect(), "{err}");
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_tutor_server(test_app(""), localhost()).await.unwrap();
        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.stopped().await;
    }
}
