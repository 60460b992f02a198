//! Shared types for the palletizer cell workspace.
//!
//! Everything the control procedures, the simulated hardware and the tick
//! driver agree on lives here: the published phase enums, the latched fault
//! set, the process activation state, and the geometry/timing configuration.

pub mod config;
pub mod fault;
pub mod phase;
pub mod process;

pub use config::{Config, ConfigError, LayoutConfig, Position};
pub use fault::Fault;
pub use phase::{ArmPhase, InletPhase, MagazinePhase};
pub use process::ProcessState;
