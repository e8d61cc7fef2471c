//! Tutor HTTP API.
//!
//! Exposes each `TutorOperation` as a `POST` route. The router is
//! composable — `tutor_router()` returns a `Router` that can be served
//! by `start_tutor_server()` or driven directly in tests.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::tutor_router;
pub use server::{start_tutor_server, ServerError, ServerSession, TutorServer};
pub use types::{ApiContext, TopicRequest};
