//! rc-remote: cycle state data for coldloop.
//!
//! Provides:
//! - The configuration request (refrigerant + evaporation/condensation temperatures)
//! - The simulation result (four state points + aggregate COP, heat and work)
//! - `SimulationSource` trait with HTTP and JSON-file backends
//!
//! # Architecture
//!
//! Thermodynamic values are never computed here: a `SimulationSource` asks an
//! external service (or a recorded response on disk) and hands back opaque
//! numbers. The rest of coldloop depends only on the trait, so sessions and
//! tests can substitute any source.
//!
//! # Example
//!
//! ```no_run
//! use rc_remote::{ConfigureRequest, HttpSource, SimulationSource};
//!
//! let source = HttpSource::new("https://example.com/api/Simulation/simulate");
//! let request = ConfigureRequest::new("R134a", -10.0, 40.0);
//! let result = source.fetch(&request).unwrap();
//! println!("COP: {:?}", result.cop);
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod source;

// Re-exports for ergonomics
pub use error::{RemoteError, RemoteResult};
pub use request::ConfigureRequest;
pub use response::{MAX_STATES, SimulationResult, StatePoint};
pub use source::{FileSource, HttpSource, SimulationSource};
