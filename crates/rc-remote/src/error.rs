//! Remote configuration errors.

use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur while obtaining cycle state data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The request failed local validation and was never sent.
    #[error("Invalid request: {what}")]
    InvalidRequest { what: &'static str },

    /// The service answered with a non-success status.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// The service could not be reached.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The body was not the expected JSON document.
    #[error("Malformed response: {message}")]
    Malformed { message: String },

    /// A recorded response could not be read.
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Malformed {
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(e: std::io::Error) -> Self {
        RemoteError::Io {
            message: e.to_string(),
        }
    }
}
