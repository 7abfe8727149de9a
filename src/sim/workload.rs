use rand::prelude::*;

use super::job::Job;
use crate::core::{Pid, Ticks};

/// Seeded random workload: at each of `ticks` ticks a job arrives with
/// probability `p_arrival`, and is short with probability `p_short`.
pub fn bernoulli_jobs(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();
    let mut next_pid: Pid = 1;

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(Job::new(next_pid, t, burst.max(1)));
            next_pid = next_pid.saturating_add(1);
        }
    }

    jobs
}
