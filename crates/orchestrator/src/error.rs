//! Error types for search sessions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Search session closed")]
    Closed,

    #[error("Search session task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
