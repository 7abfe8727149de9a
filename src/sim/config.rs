//! Workload files.
//!
//! A workload is a YAML document naming the policy, the Round-Robin quantum
//! and the processes to load, in the order they should be registered:
//!
//! ```yaml
//! policy: rr
//! quantum: 2
//! tick_interval_ms: 500
//! processes:
//!   - { pid: 1, arrival: 0, burst: 4 }
//!   - { pid: 2, arrival: 0, burst: 4 }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::job::Job;
use crate::{
    core::{SchedError, Ticks},
    scheduler::{ActiveScheduler, Policy},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read workload file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse workload YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yml::Error,
    },

    #[error("invalid workload: {0}")]
    Sched(#[from] SchedError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default)]
    pub policy: Policy,

    /// Only used by Round-Robin.
    #[serde(default)]
    pub quantum: Option<Ticks>,

    /// Wall-clock pause between ticks when driven interactively.
    #[serde(default)]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub processes: Vec<Job>,
}

impl SimConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every burst and the quantum before anything is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(job) = self.processes.iter().find(|job| job.burst < 1) {
            return Err(SchedError::InvalidProcess {
                pid: job.pid,
                burst: job.burst,
            }
            .into());
        }
        ActiveScheduler::new(self.policy, self.quantum)?;
        Ok(())
    }
}
