use thiserror::Error;

/// Result type for wfo-search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wfo-search operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The search backend could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The search backend answered with a non-success status
    #[error("Search failed with status: {status}")]
    Status { status: u16 },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a non-success status error
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }
}
