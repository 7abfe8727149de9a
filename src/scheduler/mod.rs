pub mod fcfs;
pub mod round_robin;
pub mod sjn;
pub mod srt;

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::core::{
    SchedError,
    state::{ProcIndex, Process, SchedCtx, Ticks},
};
pub use fcfs::FcfsScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjn::SjnScheduler;
pub use srt::SrtScheduler;

/// Outcome of one policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub selected: Option<ProcIndex>,
    pub terminated: bool,
}

impl Step {
    pub const IDLE: Self = Self {
        selected: None,
        terminated: false,
    };
}

pub trait Scheduler {
    const NAME: &'static str;

    /// Decide (or keep) the running process for the current tick and
    /// charge it exactly one unit of work through [`SchedCtx::run_one`].
    fn step(&mut self, ctx: &mut SchedCtx) -> Step;
}

/// Policy selector supplied at run start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Policy {
    #[default]
    Fcfs,
    Sjn,
    Srt,
    RoundRobin,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Fcfs, Policy::Sjn, Policy::Srt, Policy::RoundRobin];

    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Srt | Policy::RoundRobin)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Fcfs => FcfsScheduler::NAME,
            Policy::Sjn => SjnScheduler::NAME,
            Policy::Srt => SrtScheduler::NAME,
            Policy::RoundRobin => RoundRobinScheduler::NAME,
        };
        f.write_str(name)
    }
}

impl FromStr for Policy {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" | "first-come-first-served" => Ok(Policy::Fcfs),
            "sjn" | "sjf" | "shortest-job-next" => Ok(Policy::Sjn),
            "srt" | "srtf" | "shortest-remaining-time" => Ok(Policy::Srt),
            "rr" | "round-robin" | "roundrobin" => Ok(Policy::RoundRobin),
            _ => Err(SchedError::UnknownPolicy(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Policy {
    type Error = SchedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The policy latched for one run, with its per-run state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveScheduler {
    Fcfs(FcfsScheduler),
    Sjn(SjnScheduler),
    Srt(SrtScheduler),
    RoundRobin(RoundRobinScheduler),
}

impl ActiveScheduler {
    /// The quantum is only consulted for Round-Robin.
    pub fn new(policy: Policy, quantum: Option<Ticks>) -> Result<Self, SchedError> {
        Ok(match policy {
            Policy::Fcfs => Self::Fcfs(FcfsScheduler),
            Policy::Sjn => Self::Sjn(SjnScheduler),
            Policy::Srt => Self::Srt(SrtScheduler),
            Policy::RoundRobin => {
                let quantum = quantum.ok_or(SchedError::InvalidQuantum { quantum: None })?;
                Self::RoundRobin(RoundRobinScheduler::new(quantum)?)
            }
        })
    }

    pub fn policy(&self) -> Policy {
        match self {
            Self::Fcfs(_) => Policy::Fcfs,
            Self::Sjn(_) => Policy::Sjn,
            Self::Srt(_) => Policy::Srt,
            Self::RoundRobin(_) => Policy::RoundRobin,
        }
    }

    pub fn quantum(&self) -> Option<Ticks> {
        match self {
            Self::RoundRobin(rr) => Some(rr.quantum()),
            _ => None,
        }
    }

    pub fn step(&mut self, ctx: &mut SchedCtx) -> Step {
        match self {
            Self::Fcfs(s) => s.step(ctx),
            Self::Sjn(s) => s.step(ctx),
            Self::Srt(s) => s.step(ctx),
            Self::RoundRobin(s) => s.step(ctx),
        }
    }
}

/// Eligible process with the smallest key; registry order breaks ties.
fn select_min<K: Ord>(ctx: &SchedCtx, key: impl Fn(&Process) -> K) -> Option<ProcIndex> {
    ctx.eligible()
        .min_by_key(|&(index, process)| (key(process), index))
        .map(|(index, _)| index)
}

// Shared tail of every policy: charge the selection or idle the CPU.
fn run_selected(ctx: &mut SchedCtx, selected: Option<ProcIndex>) -> Step {
    match selected {
        Some(index) => Step {
            selected: Some(index),
            terminated: ctx.run_one(index),
        },
        None => {
            ctx.set_running(None);
            Step::IDLE
        }
    }
}
