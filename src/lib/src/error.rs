//! Errors for the vantage library and server
//!
//! Every fallible operation returns [`VantageError`]. It doubles as the HTTP
//! error type: the [`ResponseError`] impl maps each variant to a status code
//! and a JSON body, so handlers can propagate with `?`.

use actix_web::error::BlockingError;
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::constants::AUTH_REALM;
use crate::view::{
    ErrorResponse, MSG_BAD_REQUEST, MSG_CONFLICT, MSG_INTERNAL_SERVER_ERROR,
    MSG_PAYLOAD_TOO_LARGE, MSG_RESOURCE_NOT_FOUND, MSG_UNAUTHENTICATED,
};

#[derive(Debug, Error)]
pub enum VantageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("username is already registered: {0}")]
    UsernameTaken(String),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl VantageError {
    pub fn basic_str(s: impl AsRef<str>) -> Self {
        VantageError::Internal(s.as_ref().to_string())
    }

    pub fn bad_request(s: impl AsRef<str>) -> Self {
        VantageError::BadRequest(s.as_ref().to_string())
    }

    pub fn not_found(s: impl AsRef<str>) -> Self {
        VantageError::NotFound(s.as_ref().to_string())
    }

    /// Machine readable kind returned in the `status_message` field
    pub fn status_message(&self) -> &'static str {
        match self {
            VantageError::NotFound(_) => MSG_RESOURCE_NOT_FOUND,
            VantageError::Unauthorized => MSG_UNAUTHENTICATED,
            VantageError::BadRequest(_) => MSG_BAD_REQUEST,
            VantageError::UsernameTaken(_) => MSG_CONFLICT,
            VantageError::PayloadTooLarge { .. } => MSG_PAYLOAD_TOO_LARGE,
            VantageError::Config(_)
            | VantageError::Io(_)
            | VantageError::Json(_)
            | VantageError::Internal(_) => MSG_INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<toml::de::Error> for VantageError {
    fn from(err: toml::de::Error) -> Self {
        VantageError::Config(err.to_string())
    }
}

impl From<BlockingError> for VantageError {
    fn from(err: BlockingError) -> Self {
        VantageError::Internal(err.to_string())
    }
}

impl ResponseError for VantageError {
    fn status_code(&self) -> StatusCode {
        match self {
            VantageError::NotFound(_) => StatusCode::NOT_FOUND,
            VantageError::Unauthorized => StatusCode::UNAUTHORIZED,
            VantageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            VantageError::UsernameTaken(_) => StatusCode::CONFLICT,
            VantageError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("rejecting request: {}", self);
        }

        // Internal details stay in the log
        let detail = if status.is_server_error() {
            String::from("internal server error")
        } else {
            self.to_string()
        };

        let mut builder = HttpResponse::build(status);
        if let VantageError::Unauthorized = self {
            builder.insert_header((
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{AUTH_REALM}\""),
            ));
        }
        builder.json(ErrorResponse::new(self.status_message(), detail))
    }
}
