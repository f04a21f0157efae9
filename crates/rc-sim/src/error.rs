//! Error types for animation settings.

use thiserror::Error;

/// Errors raised while configuring the animation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<rc_core::RcError> for SimError {
    fn from(e: rc_core::RcError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
