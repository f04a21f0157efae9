//! Animation framework for coldloop cycles.
//!
//! Provides:
//! - Four-phase driver selecting the active pipe and refrigerant state
//! - Particle stream spawning and retiring flow tokens on the active pipe
//! - Virtual-clock timeline for cancellable periodic ticks

pub mod error;
pub mod particles;
pub mod phase;
pub mod timeline;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use particles::{
    GAS_SPAWN_PROBABILITY, LIQUID_SPAWN_PROBABILITY, PROGRESS_DIVISOR, ParticleConfig,
    ParticleStream, particle_position,
};
pub use phase::{Phase, PhaseDriver, TickOutcome};
pub use timeline::{RunFlag, Task, Timeline};
