use average::{Estimate, Mean};

use super::job::JobResult;
use crate::{
    core::{Pid, SchedCore, Ticks},
    scheduler::Policy,
};

/// Aggregate view of one finished (or interrupted) run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub policy: Option<Policy>,
    pub quantum: Option<Ticks>,
    /// Clock value at the end of the run.
    pub makespan: Ticks,
    pub idle_ticks: Ticks,
    pub context_switches: u64,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub timeline: Vec<Option<Pid>>,
    pub jobs: Vec<JobResult>,
}

impl RunSummary {
    pub fn new(core: &SchedCore, jobs: Vec<JobResult>) -> Self {
        let observer = core.observer();
        let timeline = observer.timeline().to_vec();
        let dispatches = (0..core.registry().len())
            .map(|index| observer.dispatch_count(index))
            .sum::<u64>();

        Self {
            policy: core.policy(),
            quantum: core.quantum(),
            makespan: core.now(),
            idle_ticks: observer.idle_ticks() as Ticks,
            // The first dispatch of a run is not a switch
            context_switches: dispatches.saturating_sub(1),
            avg_turnaround: avg(jobs.iter().filter_map(JobResult::turnaround)),
            avg_waiting: avg(jobs.iter().filter_map(JobResult::waiting)),
            avg_response: avg(jobs.iter().filter_map(JobResult::response)),
            timeline,
            jobs,
        }
    }

    pub fn busy_ticks(&self) -> Ticks {
        self.makespan - self.idle_ticks
    }

    /// Share of ticks the CPU spent running a process, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        if self.makespan == 0 {
            return 0.0;
        }
        self.busy_ticks() as f64 / self.makespan as f64
    }
}

// Empty samples average to 0 rather than NaN
fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = iter.map(|ticks| ticks as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}
