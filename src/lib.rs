//! Discrete-time CPU scheduling simulator.
//!
//! [`core`] holds the engine: the process registry, the clock driver and
//! the read-only snapshot handed to renderers. [`scheduler`] holds the four
//! policies (FCFS, SJN, SRT, Round-Robin). [`sim`] layers batch runs,
//! workload files and summary metrics on top.

pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{EngineState, SchedCore, SchedCoreEvent, SchedError, Snapshot};
pub use scheduler::{Policy, Scheduler};
pub use sim::{Job, Sim, SimConfig};
