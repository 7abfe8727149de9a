pub mod config;
pub mod driver;
pub mod job;
pub mod metrics;
pub mod workload;

pub use config::{ConfigError, SimConfig};
pub use driver::Sim;
pub use job::{Job, JobResult};
pub use metrics::RunSummary;
pub use workload::bernoulli_jobs;
