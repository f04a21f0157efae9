//! rc-core: stable foundation for coldloop.
//!
//! Contains:
//! - kind (the four component kinds + their static lookup tables)
//! - geometry (points, component bodies, quadratic pipe curves)
//! - state (refrigerant-state tags + particles)
//! - numeric (finiteness and probability checks)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod kind;
pub mod numeric;
pub mod state;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RcError, RcResult};
pub use geometry::*;
pub use kind::*;
pub use numeric::*;
pub use state::*;
