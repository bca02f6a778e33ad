#![deny(warnings)]
pub mod engine;
pub mod oracle;
pub mod pacing;
pub mod planner;
pub mod sequencer;

pub use engine::{ActionTag, Decision, Engine, Inbound, OutboundAction, Snapshot};
pub use oracle::{AnalysisConfig, Oracle, OracleError};
pub use pacing::{Pacer, PacingConfig, Persona};
pub use planner::PlannedHop;
pub use sequencer::TimedAction;
