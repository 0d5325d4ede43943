//! Error types for the search client

use std::fmt;

/// Errors that can occur while talking to the search backend
#[derive(Debug)]
pub enum ClientError {
    /// Client could not be built from its configuration
    ConfigError(String),

    /// The request never produced a response
    TransportError { kind: &'static str, message: String },

    /// The backend answered with a non-success status
    StatusError { status: u16, body: String },

    /// The response body was not a result page
    DecodeError(String),
}

impl ClientError {
    /// Classify a reqwest failure for logging
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connection"
        } else if e.is_request() {
            "request build"
        } else if e.is_body() {
            "body"
        } else {
            "unknown"
        };
        Self::TransportError {
            kind,
            message: e.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            Self::TransportError { kind, message } => {
                write!(f, "Search request failed ({kind}): {message}")
            }
            Self::StatusError { status, body } => {
                write!(f, "Search failed with status: {status}: {body}")
            }
            Self::DecodeError(msg) => write!(f, "Failed to decode search response: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for wfo_search_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ConfigError(msg) => wfo_search_core::Error::config(msg),
            ClientError::StatusError { status, .. } => wfo_search_core::Error::status(status),
            other => wfo_search_core::Error::transport(other.to_string()),
        }
    }
}
