//! Route handlers.
//!
//! Each handler unwraps the JSON body, then runs the core operation on the
//! blocking pool: Argon2 is CPU-bound and would otherwise stall the async
//! workers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use festfriend_protocol::service::Result as ServiceResult;

use super::error::ApiError;
use super::wire::{
    CreateGroupRequest, CreateGroupResponse, GetMembersRequest, JoinGroupRequest,
    MembersResponse, MessageResponse,
};
use super::AppState;

/// Run a core operation off the async executor.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(inner)| inner).map_err(|rejection| {
        log::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidPayload(rejection.body_text())
    })
}

/// `POST /group/create`
pub async fn create_group(
    State(state): State<AppState>,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<Json<CreateGroupResponse>, ApiError> {
    let CreateGroupRequest { password } = parse_body(body)?;

    let service = state.service.clone();
    let group_id = run_blocking(move || service.create_group(&password)).await?;

    Ok(Json(CreateGroupResponse { group_id }))
}

/// `POST /join`
pub async fn join_group(
    State(state): State<AppState>,
    body: Result<Json<JoinGroupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let JoinGroupRequest {
        group_id,
        password,
        username,
    } = parse_body(body)?;

    let service = state.service.clone();
    run_blocking(move || service.join_group(group_id, &password, &username)).await?;

    Ok(Json(MessageResponse::ok()))
}

/// `POST /group/members`
pub async fn get_members(
    State(state): State<AppState>,
    body: Result<Json<GetMembersRequest>, JsonRejection>,
) -> Result<Json<MembersResponse>, ApiError> {
    let GetMembersRequest { group_id, password } = parse_body(body)?;

    let service = state.service.clone();
    let members = run_blocking(move || service.get_members(group_id, &password)).await?;

    Ok(Json(MembersResponse { members }))
}
