//! Error taxonomy for the scheduling engine.
//!
//! Every variant is a rejected call: the engine state is left exactly as it
//! was before the call and remains usable.

use super::{
    driver::EngineState,
    state::{Pid, Ticks},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedError {
    #[error("invalid process {pid}: burst must be at least 1 (got {burst})")]
    InvalidProcess { pid: Pid, burst: Ticks },

    /// Round-Robin was selected without a positive quantum.
    #[error("invalid quantum {quantum:?}: round-robin needs a quantum of at least 1")]
    InvalidQuantum { quantum: Option<Ticks> },

    #[error("cannot {op} while engine is {state:?}")]
    InvalidState { op: &'static str, state: EngineState },

    #[error("unknown policy {0:?}: expected one of fcfs, sjn, srt, rr")]
    UnknownPolicy(String),
}
