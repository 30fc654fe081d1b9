//! JSON request and response bodies.
//!
//! Field names match the deployed clients (`groupID`, `detail`).

use festfriend_protocol::GroupId;
use serde::{Deserialize, Serialize};

/// `POST /group/create`
#[derive(Deserialize)]
pub struct CreateGroupRequest {
    pub password: String,
}

/// `POST /group/members`
///
/// `groupID` arrives as a signed integer and is normalized by the core.
#[derive(Deserialize)]
pub struct GetMembersRequest {
    #[serde(rename = "groupID")]
    pub group_id: i64,
    pub password: String,
}

/// `POST /join`
#[derive(Deserialize)]
pub struct JoinGroupRequest {
    #[serde(rename = "groupID")]
    pub group_id: i64,
    pub password: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CreateGroupResponse {
    #[serde(rename = "groupID")]
    pub group_id: GroupId,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MembersResponse {
    pub members: Vec<String>,
}

/// Body of every error response.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}
