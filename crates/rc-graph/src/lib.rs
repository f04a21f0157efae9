//! rc-graph: cycle graph layer for coldloop.
//!
//! Provides:
//! - Placement registry (at most one component per kind, anchor geometry)
//! - Connection validator (fixed successor table, lives, penalties)
//! - Cycle completeness check gating simulation start
//!
//! # Example
//!
//! ```
//! use rc_core::{ComponentKind, Vec2};
//! use rc_graph::{CycleGraph, ProposalOutcome};
//!
//! let mut graph = CycleGraph::new(3);
//! graph.place(ComponentKind::Compressor, Vec2::new(300.0, 80.0)).unwrap();
//! graph.place(ComponentKind::Condenser, Vec2::new(520.0, 200.0)).unwrap();
//!
//! let outcome = graph
//!     .propose(ComponentKind::Compressor, ComponentKind::Condenser)
//!     .unwrap();
//! assert_eq!(outcome, ProposalOutcome::Accepted);
//! assert_eq!(graph.connections().len(), 1);
//! ```

pub mod error;
pub mod graph;
pub mod registry;
pub mod validate;
pub mod validator;

// Re-exports for ergonomics
pub use error::{GraphError, GraphResult};
pub use graph::{Component, Connection, CycleGraph};
pub use registry::{PlacementRegistry, PressTarget};
pub use validate::{StartBlocker, check_startable, is_complete_cycle};
pub use validator::{ConnectionValidator, Lives, ProposalOutcome};
