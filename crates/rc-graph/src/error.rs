//! Graph-specific error types.

use rc_core::ComponentKind;

pub type GraphResult<T> = Result<T, GraphError>;

/// Placement and connection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A component of this kind is already on the canvas.
    DuplicateKind { kind: ComponentKind },

    /// The referenced component has not been placed.
    NotPlaced { kind: ComponentKind },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateKind { kind } => {
                write!(f, "Only one {} may be placed", kind)
            }
            GraphError::NotPlaced { kind } => {
                write!(f, "{} has not been placed", kind)
            }
        }
    }
}

impl std::error::Error for GraphError {}
