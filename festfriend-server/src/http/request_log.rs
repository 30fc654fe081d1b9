//! Per-request logging middleware.
//!
//! Buffers the body (bounded by the configured limit), logs method and path,
//! then hands the request on with the body re-attached. Purely observational.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::AppState;

pub async fn log_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|_| ApiError::PayloadTooLarge)?;

    log::info!(
        "Request: {} {} ({} bytes)",
        parts.method,
        parts.uri.path(),
        bytes.len()
    );
    // Bodies carry plaintext passwords
    #[cfg(feature = "debug-logs")]
    log::debug!("Request body: {}", String::from_utf8_lossy(&bytes));

    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();
    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    log::debug!("Response: {} {} -> {}", method, path, response.status());
    Ok(response)
}
