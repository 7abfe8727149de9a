//! Read-only view of the engine handed to renderers after each tick.
//!
//! A [`Snapshot`] is an owned copy: holding one never borrows the engine and
//! nothing written to it flows back.

use super::{
    driver::EngineState,
    state::{Pid, Process, Ticks},
};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub remaining: Ticks,
    pub running: bool,
    pub completed: bool,
    pub start_time: Option<Ticks>,
    pub finish_time: Option<Ticks>,
}

impl ProcessView {
    pub(crate) fn new(process: &Process, running: bool) -> Self {
        Self {
            pid: process.pid,
            arrival: process.arrival,
            burst: process.burst,
            remaining: process.remaining(),
            running,
            completed: process.is_completed(),
            start_time: process.start_time(),
            finish_time: process.finish_time(),
        }
    }

    /// Fraction of the burst already executed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.burst - self.remaining) as f64 / self.burst as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub clock: Ticks,
    pub state: EngineState,
    pub policy: Option<Policy>,
    /// Process holding the CPU going into the next tick.
    pub running: Option<Pid>,
    /// Process charged on the most recent tick, `None` if it was idle.
    pub last_ran: Option<Pid>,
    pub processes: Vec<ProcessView>,
}

impl Snapshot {
    pub fn completed_count(&self) -> usize {
        self.processes.iter().filter(|p| p.completed).count()
    }
}
