use std::{path::PathBuf, process::ExitCode, thread, time::Duration};

use clap::Parser;
use sched_sim::{
    Policy, SchedCoreEvent, Sim, SimConfig,
    core::{Pid, Ticks},
    sim::{ConfigError, RunSummary, bernoulli_jobs},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_QUANTUM: Ticks = 2;
const DEMO_TICKS: Ticks = 20;

#[derive(Debug, Parser)]
#[command(name = "sched_sim", version, about = "Simulate FCFS, SJN, SRT and Round-Robin scheduling")]
struct Args {
    /// YAML workload file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// fcfs, sjn, srt or rr (overrides the workload file)
    #[arg(short, long)]
    policy: Option<Policy>,

    /// Round-Robin quantum (overrides the workload file)
    #[arg(short, long)]
    quantum: Option<Ticks>,

    /// Milliseconds to sleep between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Run every policy over the same workload and compare
    #[arg(long)]
    compare: bool,

    /// Print engine events for every tick
    #[arg(short, long)]
    events: bool,

    /// Generate a random workload spanning this many ticks
    #[arg(long, value_name = "TICKS")]
    generate: Option<Ticks>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 0.3)]
    p_arrival: f64,

    #[arg(long, default_value_t = 0.3)]
    p_short: f64,

    #[arg(long, default_value_t = 2)]
    short_burst: Ticks,

    #[arg(long, default_value_t = 6)]
    long_burst: Ticks,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let config = load_config(args)?;
    config.validate()?;

    if args.compare {
        compare(&config)
    } else {
        simulate(&config, args.events)
    }
}

fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading workload");
            SimConfig::from_file(path)?
        }
        None => SimConfig::default(),
    };

    let generate = match (args.generate, config.processes.is_empty()) {
        (Some(ticks), _) => Some(ticks),
        (None, true) => {
            info!(ticks = DEMO_TICKS, "No processes given, generating a workload");
            Some(DEMO_TICKS)
        }
        (None, false) => None,
    };
    if let Some(ticks) = generate {
        if !config.processes.is_empty() {
            warn!(
                count = config.processes.len(),
                "Generated workload replaces processes from the workload file"
            );
        }
        config.processes = bernoulli_jobs(
            ticks,
            args.p_arrival,
            args.p_short,
            args.short_burst,
            args.long_burst,
            args.seed,
        );
    }

    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(quantum) = args.quantum {
        config.quantum = Some(quantum);
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    Ok(config)
}

fn simulate(config: &SimConfig, print_events: bool) -> Result<(), ConfigError> {
    let mut sim = Sim::new(&config.processes)?;
    sim.start(config.policy, config.quantum)?;

    let cadence = Duration::from_millis(config.tick_interval_ms);
    while !sim.all_jobs_completed() {
        let now = sim.core().now();
        let events = sim.step()?;
        if print_events {
            for event in events.iter().filter(|e| !matches!(e, SchedCoreEvent::Ran { .. })) {
                println!("t={now} {event:?}");
            }
        }
        if !cadence.is_zero() {
            thread::sleep(cadence);
        }
    }

    let summary = sim.summary();
    print_timeline(&summary.timeline);
    print_jobs(&summary);
    print_summary_header();
    print_summary_row(&summary);
    Ok(())
}

fn compare(config: &SimConfig) -> Result<(), ConfigError> {
    let mut sim = Sim::new(&config.processes)?;
    print_summary_header();
    for policy in Policy::ALL {
        let quantum = match policy {
            Policy::RoundRobin => Some(config.quantum.unwrap_or(DEFAULT_QUANTUM)),
            _ => None,
        };
        let summary = sim.run(policy, quantum)?;
        print_summary_row(&summary);
        sim.reset();
    }
    Ok(())
}

// Collapse the per-tick timeline into `[start, end) pid` stints.
fn stints(timeline: &[Option<Pid>]) -> Vec<(Ticks, Ticks, Option<Pid>)> {
    let mut out: Vec<(Ticks, Ticks, Option<Pid>)> = Vec::new();
    for (tick, &pid) in (0..).zip(timeline) {
        match out.last_mut() {
            Some((_, end, last)) if *last == pid => *end = tick + 1,
            _ => out.push((tick, tick + 1, pid)),
        }
    }
    out
}

fn print_timeline(timeline: &[Option<Pid>]) {
    println!("Timeline:");
    for (start, end, pid) in stints(timeline) {
        let label = pid.map_or_else(|| "idle".to_owned(), |pid| format!("P{pid}"));
        println!("  [{start:>4}, {end:>4})  {label}");
    }
}

fn print_jobs(summary: &RunSummary) {
    println!();
    println!(
        "{:>6} {:>8} {:>6} {:>6} {:>8} {:>11} {:>8} {:>9}",
        "PID", "Arrival", "Burst", "Start", "Finish", "Turnaround", "Waiting", "Response"
    );
    for result in &summary.jobs {
        let show = |value: Option<Ticks>| value.map_or_else(|| "-".to_owned(), |v| v.to_string());
        println!(
            "{:>6} {:>8} {:>6} {:>6} {:>8} {:>11} {:>8} {:>9}",
            result.job.pid,
            result.job.arrival,
            result.job.burst,
            show(result.start_time),
            show(result.completion_time),
            show(result.turnaround()),
            show(result.waiting()),
            show(result.response()),
        );
    }
    println!();
}

fn print_summary_header() {
    println!(
        "{:<8} {:>8} {:>6} {:>9} {:>14} {:>12} {:>13} {:>12}",
        "Policy", "Makespan", "Idle", "Switches", "Avg turnaround", "Avg waiting", "Avg response", "Utilization"
    );
}

fn print_summary_row(summary: &RunSummary) {
    let policy = match (summary.policy, summary.quantum) {
        (Some(policy), Some(quantum)) => format!("{policy}(q={quantum})"),
        (Some(policy), None) => policy.to_string(),
        (None, _) => "-".to_owned(),
    };
    println!(
        "{:<8} {:>8} {:>6} {:>9} {:>14.2} {:>12.2} {:>13.2} {:>11.1}%",
        policy,
        summary.makespan,
        summary.idle_ticks,
        summary.context_switches,
        summary.avg_turnaround,
        summary.avg_waiting,
        summary.avg_response,
        summary.utilization() * 100.0
    );
}
