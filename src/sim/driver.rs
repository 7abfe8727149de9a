use tracing::warn;

use super::{
    job::{Job, JobResult},
    metrics::RunSummary,
};
use crate::{
    core::{Pid, SchedCore, SchedCoreEvent, SchedError, Ticks},
    scheduler::Policy,
};

/// Batch front end: loads a job list into an engine and drives it.
pub struct Sim {
    core: SchedCore,
}

impl Sim {
    pub fn new(jobs: &[Job]) -> Result<Self, SchedError> {
        let mut sim = Self {
            core: SchedCore::new(),
        };
        for job in jobs {
            sim.add_job(job)?;
        }
        Ok(sim)
    }

    pub fn core(&self) -> &SchedCore {
        &self.core
    }

    pub fn add_job(&mut self, job: &Job) -> Result<(), SchedError> {
        if self.core.registry().all().iter().any(|p| p.pid == job.pid) {
            warn!(pid = job.pid, "Duplicate pid; lookups resolve to its first entry");
        }
        self.core.add_process(job.pid, job.arrival, job.burst)?;
        Ok(())
    }

    pub fn clear_jobs(&mut self) -> Result<(), SchedError> {
        self.core.clear_processes()
    }

    pub fn start(&mut self, policy: Policy, quantum: Option<Ticks>) -> Result<(), SchedError> {
        self.core.start(policy, quantum)
    }

    pub fn step(&mut self) -> Result<Vec<SchedCoreEvent>, SchedError> {
        self.core.tick()
    }

    /// Start a run and tick it to completion.
    pub fn run(&mut self, policy: Policy, quantum: Option<Ticks>) -> Result<RunSummary, SchedError> {
        self.start(policy, quantum)?;
        while !self.all_jobs_completed() {
            self.step()?;
        }
        Ok(self.summary())
    }

    /// Reset the engine so the same jobs can be run again.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.is_completed()
    }

    pub fn results(&self) -> Vec<JobResult> {
        self.core
            .registry()
            .all()
            .iter()
            .map(JobResult::from_process)
            .collect()
    }

    pub fn result(&self, pid: Pid) -> Option<JobResult> {
        self.core
            .registry()
            .all()
            .iter()
            .find(|p| p.pid == pid)
            .map(JobResult::from_process)
    }

    pub fn jobs_map<T>(&self, f: impl Fn(&JobResult) -> Option<T>) -> impl Iterator<Item = T> {
        self.results().into_iter().filter_map(move |job| f(&job))
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::new(&self.core, self.results())
    }
}
