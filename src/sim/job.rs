use serde::Deserialize;

use crate::core::{Pid, Process, Ticks};

/// A process definition as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub pid: Pid,
    #[serde(default)]
    pub arrival: Ticks,
    pub burst: Ticks,
}

impl Job {
    pub fn new(pid: Pid, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            pid,
            arrival,
            burst,
        }
    }
}

/// Per-job timing once a run has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobResult {
    pub job: Job,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl JobResult {
    pub(crate) fn from_process(process: &Process) -> Self {
        Self {
            job: Job::new(process.pid, process.arrival, process.burst),
            start_time: process.start_time(),
            completion_time: process.finish_time(),
        }
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion_time
            .map(|done| done.saturating_sub(self.job.arrival))
    }

    /// Time spent eligible but not running.
    pub fn waiting(&self) -> Option<Ticks> {
        self.turnaround()
            .map(|turnaround| turnaround.saturating_sub(self.job.burst))
    }

    /// Delay between arrival and first dispatch.
    pub fn response(&self) -> Option<Ticks> {
        self.start_time
            .map(|start| start.saturating_sub(self.job.arrival))
    }
}
