//! Client error types.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be delivered or no response was received.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered with a status of 400 or above.
    ///
    /// `body` is the raw response text; the Connect API does not use one error
    /// shape across all endpoints, so it is kept verbatim.
    #[error("{method} {url} failed ({status}): {body}")]
    Api {
        /// Verb of the failed request.
        method: Method,
        /// Full request URL.
        url: String,
        /// HTTP status code.
        status: StatusCode,
        /// Response body text.
        body: String,
    },

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server reported 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Check if the server reported 409, e.g. during a worker rebalance.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if status.is_server_error())
    }

    /// Check if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }

    /// Parse the body of an API error as a Connect error response.
    ///
    /// Returns `None` when this is not an API error or the body has another
    /// shape.
    pub fn api_error(&self) -> Option<ErrorResponse> {
        match self {
            Error::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by most Connect endpoints.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub message: String,
}
