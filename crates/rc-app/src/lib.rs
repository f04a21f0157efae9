//! Shared application service layer for coldloop.
//!
//! This crate ties the lower layers into one [`Session`] aggregate and
//! provides what a front end needs around it: data-table rows, signals, draw
//! lists, YAML options and layouts, a background configuration worker and a
//! cooperative [`Runner`] for the periodic ticks.

pub mod config_worker;
pub mod draw;
pub mod error;
pub mod layout;
pub mod options;
pub mod runner;
pub mod session;
pub mod signals;
pub mod table;

// Re-export key types for convenience
pub use config_worker::ConfigWorker;
pub use draw::{ComponentDraw, ConnectionDraw, DrawList, ParticleDraw};
pub use error::{AppError, AppResult};
pub use layout::{Layout, Link, Placement, ReplayStep};
pub use options::{RemoteOptions, SessionOptions};
pub use runner::{NullObserver, Runner, SessionObserver};
pub use session::{ComponentSummary, ConfigStatus, Session};
pub use signals::Signal;
pub use table::{DataRow, STATE_CATALOG, StateSlot};
