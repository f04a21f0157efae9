//! Error types for the rc-app service layer.

use std::path::PathBuf;

use rc_graph::{GraphError, StartBlocker};
use rc_remote::RemoteError;

/// Application error type that wraps errors from the lower crates and the
/// session's own preconditions.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Configure the refrigerant and temperatures before starting")]
    NotConfigured,

    #[error("A configuration request is already in progress")]
    ConfigurationBusy,

    #[error("Cannot change the configuration while the simulation is running")]
    SimulationRunning,

    #[error("Simulation is already running")]
    AlreadyRunning,

    #[error("Game over: reset to play again")]
    GameOver,

    #[error("Cannot start: {0}")]
    StartBlocked(#[from] StartBlocker),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Options error: {0}")]
    Options(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<rc_sim::SimError> for AppError {
    fn from(err: rc_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::ComponentKind;

    #[test]
    fn messages_pass_through() {
        let err: AppError = GraphError::DuplicateKind {
            kind: ComponentKind::Compressor,
        }
        .into();
        assert_eq!(err.to_string(), "Only one Compressor may be placed");

        let err: AppError = StartBlocker::MissingConnections { connected: 2 }.into();
        assert!(err.to_string().starts_with("Cannot start: All components"));

        let err: AppError = RemoteError::Status { status: 502 }.into();
        assert_eq!(err.to_string(), "Configuration error: HTTP error: 502");
    }
}
