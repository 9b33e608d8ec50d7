//! Error types for the site backend
//!
//! Every route failure is an `ApiError`, which knows its HTTP status and
//! the JSON body returned to the client. Store and mail failures keep their
//! own types so callers can decide whether they are fatal.

use serde_json::json;
use thiserror::Error;

use super::http::ApiResponse;

/// Document store failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached or is in a broken state
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the write or query
    #[error("document store rejected the request: {0}")]
    Rejected(String),
}

/// Outgoing mail failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("failed to render email template: {0}")]
    Template(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

impl From<mustache::Error> for MailError {
    fn from(e: mustache::Error) -> Self {
        MailError::Template(e.to_string())
    }
}

/// Route-level error with an HTTP status
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found")]
    NotFound,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::Conflict(_) => 409,
            ApiError::Store(_) | ApiError::Internal(_) => 500,
        }
    }

    /// Client-facing response; internal details stay in the log
    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let message = match &self {
            ApiError::Store(_) | ApiError::Internal(_) => {
                log::error!("request failed: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        ApiResponse::new(status, json!({ "success": false, "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), 400);
        assert_eq!(ApiError::Conflict("x".into()).status(), 409);
        assert_eq!(ApiError::NotFound.status(), 404);
        assert_eq!(ApiError::MethodNotAllowed("PUT".into()).status(), 405);
        assert_eq!(ApiError::Store(StoreError::Unavailable("down".into())).status(), 500);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = ApiError::Store(StoreError::Unavailable("db password wrong".into())).into_response();
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let response = ApiError::BadRequest("Invalid email format".into()).into_response();
        assert_eq!(response.body["error"], "Invalid email format");
        assert_eq!(response.body["success"], false);
    }
}
