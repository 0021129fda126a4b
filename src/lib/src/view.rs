//! JSON bodies returned by the server

use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

pub const MSG_RESOURCE_CREATED: &str = "resource_created";
pub const MSG_RESOURCE_FOUND: &str = "resource_found";
pub const MSG_RESOURCE_NOT_FOUND: &str = "resource_not_found";
pub const MSG_UNAUTHENTICATED: &str = "unauthenticated";
pub const MSG_BAD_REQUEST: &str = "bad_request";
pub const MSG_CONFLICT: &str = "conflict";
pub const MSG_PAYLOAD_TOO_LARGE: &str = "payload_too_large";
pub const MSG_INTERNAL_SERVER_ERROR: &str = "internal_server_error";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub status: String,
    pub status_message: String,
}

impl StatusMessage {
    pub fn resource_created() -> StatusMessage {
        StatusMessage {
            status: String::from(STATUS_SUCCESS),
            status_message: String::from(MSG_RESOURCE_CREATED),
        }
    }

    pub fn resource_found() -> StatusMessage {
        StatusMessage {
            status: String::from(STATUS_SUCCESS),
            status_message: String::from(MSG_RESOURCE_FOUND),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub status: String,
    pub status_message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status_message: &str, error: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            status: String::from(STATUS_ERROR),
            status_message: String::from(status_message),
            error: error.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub status: StatusMessage,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub status: StatusMessage,
    /// Name the file was stored under
    pub filename: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListResultsResponse {
    #[serde(flatten)]
    pub status: StatusMessage,
    pub results: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListExperimentsResponse {
    #[serde(flatten)]
    pub status: StatusMessage,
    pub experiments: Vec<String>,
}
