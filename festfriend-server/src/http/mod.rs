//! HTTP binding of the group operations.
//!
//! - POST /group/create  - `{password}` -> `{groupID}`
//! - POST /join          - `{groupID, password, username}` -> `{message: "OK"}`
//! - POST /group/members - `{groupID, password}` -> `{members}`
//!
//! Failures answer with `{"detail": "..."}` and the status from [`ApiError`].

pub mod error;
pub mod handlers;
pub mod request_log;
pub mod server;
pub mod wire;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::post;
use axum::Router;
use festfriend_protocol::GroupService;

pub use error::ApiError;
pub use server::{GroupServer, RunningServer, ServerError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: GroupService,
    pub max_body_bytes: usize,
}

/// Build the router for the group endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/group/create", post(handlers::create_group))
        .route("/join", post(handlers::join_group))
        .route("/group/members", post(handlers::get_members))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log::log_requests,
        ))
        .with_state(state)
}
