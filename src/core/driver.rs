use tracing::{debug, info, trace, warn};

use super::{
    error::SchedError,
    event::SchedCoreEvent,
    observer::Observer,
    snapshot::{ProcessView, Snapshot},
    state::{Pid, ProcIndex, Process, Registry, SchedCtx, Ticks},
};
use crate::scheduler::{ActiveScheduler, Policy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Clock driver: owns the registry, latches a policy at `start` and
/// applies it once per `tick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedCore {
    ctx: SchedCtx,
    scheduler: Option<ActiveScheduler>,
    state: EngineState,
    observer: Observer,
}

impl SchedCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_process(
        &mut self,
        pid: Pid,
        arrival: Ticks,
        burst: Ticks,
    ) -> Result<&Process, SchedError> {
        self.ensure_state("add a process", EngineState::Idle)?;
        self.ctx.registry_mut().add(pid, arrival, burst).inspect_err(|err| {
            warn!(%err, "Process rejected");
        })
    }

    pub fn clear_processes(&mut self) -> Result<(), SchedError> {
        if self.state == EngineState::Running {
            return Err(self.reject("clear processes"));
        }
        self.ctx.registry_mut().clear();
        Ok(())
    }

    /// Latch `policy` and begin a run at clock 0.
    ///
    /// With nothing to run the engine goes straight to `Completed`.
    pub fn start(&mut self, policy: Policy, quantum: Option<Ticks>) -> Result<(), SchedError> {
        self.ensure_state("start", EngineState::Idle)?;
        let scheduler = ActiveScheduler::new(policy, quantum).inspect_err(|err| {
            warn!(%policy, %err, "Start rejected");
        })?;

        if quantum.is_some() && scheduler.quantum().is_none() {
            debug!(%policy, "Quantum ignored for non-round-robin policy");
        }

        self.ctx.rewind();
        self.observer = Observer::new();
        self.scheduler = Some(scheduler);
        self.state = EngineState::Running;
        info!(
            %policy,
            quantum = ?self.quantum(),
            processes = self.ctx.registry().len(),
            "Run started"
        );

        if self.ctx.registry().all_completed() {
            self.state = EngineState::Completed;
            info!(clock = self.now(), "Run completed");
        }
        Ok(())
    }

    /// Advance the simulation by one tick.
    ///
    /// The policy decides against the pre-increment clock; the clock is
    /// advanced after the unit of work is applied.
    pub fn tick(&mut self) -> Result<Vec<SchedCoreEvent>, SchedError> {
        self.ensure_state("tick", EngineState::Running)?;
        let Some(scheduler) = self.scheduler.as_mut() else {
            return Err(self.reject("tick"));
        };

        let now = self.ctx.now();
        let prev = self.ctx.running();
        let step = scheduler.step(&mut self.ctx);

        let mut events = Vec::new();
        match step.selected {
            Some(index) => {
                let pid = self.pid_at(index);
                if prev != Some(index) {
                    if let Some(prev_index) = prev {
                        let preempted = self.pid_at(prev_index);
                        debug!(tick = now, pid = preempted, by = pid, "Preempted");
                        events.push(SchedCoreEvent::Preempted { pid: preempted, by: pid });
                    }
                    debug!(tick = now, pid, "Dispatched");
                    events.push(SchedCoreEvent::Dispatched { pid });
                }

                let remaining = self
                    .ctx
                    .registry()
                    .get(index)
                    .map_or(0, Process::remaining);
                events.push(SchedCoreEvent::Ran { pid, remaining });

                if step.terminated {
                    let finish_time = now.saturating_add(1);
                    debug!(tick = now, pid, finish_time, "Process completed");
                    events.push(SchedCoreEvent::ProcessCompleted { pid, finish_time });
                }
            }
            None => {
                trace!(tick = now, "CPU idle");
                events.push(SchedCoreEvent::CpuIdle);
            }
        }

        self.ctx.advance_time(1);
        self.observer.observe(&self.ctx, step);

        if self.ctx.registry().all_completed() {
            self.state = EngineState::Completed;
            let clock = self.ctx.now();
            info!(clock, idle_ticks = self.observer.idle_ticks(), "Run completed");
            events.push(SchedCoreEvent::RunCompleted { clock });
        }

        Ok(events)
    }

    /// Return the engine and every process to their pre-start state.
    ///
    /// Legal from any state; resetting an idle engine changes nothing.
    pub fn reset(&mut self) {
        if self.state != EngineState::Idle {
            info!(from = ?self.state, clock = self.now(), "Engine reset");
        }
        self.ctx.registry_mut().reset();
        self.ctx.rewind();
        self.scheduler = None;
        self.observer = Observer::new();
        self.state = EngineState::Idle;
    }

    pub fn snapshot(&self) -> Snapshot {
        let running = self.ctx.running();
        Snapshot {
            clock: self.now(),
            state: self.state,
            policy: self.policy(),
            running: running.map(|index| self.pid_at(index)),
            last_ran: self.observer.timeline().last().copied().flatten(),
            processes: self
                .ctx
                .registry()
                .all()
                .iter()
                .enumerate()
                .map(|(index, p)| ProcessView::new(p, running == Some(index)))
                .collect(),
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == EngineState::Completed
    }

    pub fn policy(&self) -> Option<Policy> {
        self.scheduler.as_ref().map(ActiveScheduler::policy)
    }

    pub fn quantum(&self) -> Option<Ticks> {
        self.scheduler.as_ref().and_then(ActiveScheduler::quantum)
    }

    pub fn running(&self) -> Option<&Process> {
        self.ctx
            .running()
            .and_then(|index| self.ctx.registry().get(index))
    }

    pub fn registry(&self) -> &Registry {
        self.ctx.registry()
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    fn pid_at(&self, index: ProcIndex) -> Pid {
        self.ctx
            .registry()
            .get(index)
            .map_or(Pid::default(), |p| p.pid)
    }

    fn ensure_state(&self, op: &'static str, expected: EngineState) -> Result<(), SchedError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.reject(op))
        }
    }

    fn reject(&self, op: &'static str) -> SchedError {
        let err = SchedError::InvalidState {
            op,
            state: self.state,
        };
        warn!(%err, "Operation rejected");
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn core_with(procs: &[(Pid, Ticks, Ticks)]) -> SchedCore {
        let mut core = SchedCore::new();
        for &(pid, arrival, burst) in procs {
            core.add_process(pid, arrival, burst).unwrap();
        }
        core
    }

    fn run(core: &mut SchedCore) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();
        while !core.is_completed() {
            events.extend(core.tick().unwrap());
        }
        events
    }

    #[test]
    fn tick_before_start_is_rejected() {
        let mut core = core_with(&[(1, 0, 1)]);
        assert_eq!(
            core.tick().unwrap_err(),
            SchedError::InvalidState {
                op: "tick",
                state: EngineState::Idle
            }
        );
        assert_eq!(core.now(), 0);
    }

    #[test]
    fn tick_after_completion_is_rejected() {
        let mut core = core_with(&[(1, 0, 1)]);
        core.start(Policy::Fcfs, None).unwrap();
        core.tick().unwrap();
        assert!(core.is_completed());
        let before = core.snapshot();
        assert!(matches!(
            core.tick(),
            Err(SchedError::InvalidState {
                state: EngineState::Completed,
                ..
            })
        ));
        assert_eq!(core.snapshot(), before);
    }

    #[test]
    fn registry_is_frozen_while_running() {
        let mut core = core_with(&[(1, 0, 2)]);
        core.start(Policy::Sjn, None).unwrap();
        assert!(core.add_process(2, 0, 1).is_err());
        assert!(core.clear_processes().is_err());
        assert_eq!(core.registry().len(), 1);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut core = core_with(&[(1, 0, 2)]);
        core.start(Policy::Srt, None).unwrap();
        assert!(core.start(Policy::Fcfs, None).is_err());
        assert_eq!(core.policy(), Some(Policy::Srt));
    }

    #[test]
    fn invalid_quantum_leaves_engine_idle() {
        let mut core = core_with(&[(1, 0, 2)]);
        assert_eq!(
            core.start(Policy::RoundRobin, Some(0)).unwrap_err(),
            SchedError::InvalidQuantum { quantum: Some(0) }
        );
        assert_eq!(core.state(), EngineState::Idle);
        assert_eq!(core.policy(), None);
        core.start(Policy::RoundRobin, Some(1)).unwrap();
        assert_eq!(core.quantum(), Some(1));
    }

    #[test]
    fn invalid_process_leaves_registry_unchanged() {
        let mut core = core_with(&[(1, 0, 2)]);
        assert!(core.add_process(2, 0, 0).is_err());
        assert_eq!(core.registry().len(), 1);
    }

    #[test]
    fn empty_registry_completes_at_start() {
        let mut core = SchedCore::new();
        core.start(Policy::RoundRobin, Some(4)).unwrap();
        assert!(core.is_completed());
        assert_eq!(core.now(), 0);
    }

    #[test]
    fn events_describe_preemption() {
        let mut core = core_with(&[(1, 0, 5), (2, 2, 2)]);
        core.start(Policy::Srt, None).unwrap();
        core.tick().unwrap();
        core.tick().unwrap();
        let events = core.tick().unwrap();
        assert_eq!(
            events,
            vec![
                SchedCoreEvent::Preempted { pid: 1, by: 2 },
                SchedCoreEvent::Dispatched { pid: 2 },
                SchedCoreEvent::Ran {
                    pid: 2,
                    remaining: 1
                },
            ]
        );
    }

    #[test]
    fn final_tick_reports_completion() {
        let mut core = core_with(&[(1, 0, 1)]);
        core.start(Policy::Fcfs, None).unwrap();
        let events = core.tick().unwrap();
        assert_eq!(
            events,
            vec![
                SchedCoreEvent::Dispatched { pid: 1 },
                SchedCoreEvent::Ran {
                    pid: 1,
                    remaining: 0
                },
                SchedCoreEvent::ProcessCompleted {
                    pid: 1,
                    finish_time: 1
                },
                SchedCoreEvent::RunCompleted { clock: 1 },
            ]
        );
    }

    #[test]
    fn idle_ticks_advance_the_clock() {
        let mut core = core_with(&[(1, 2, 1)]);
        core.start(Policy::Fcfs, None).unwrap();
        assert_eq!(core.tick().unwrap(), vec![SchedCoreEvent::CpuIdle]);
        assert_eq!(core.tick().unwrap(), vec![SchedCoreEvent::CpuIdle]);
        assert_eq!(core.now(), 2);
        run(&mut core);
        assert_eq!(core.now(), 3);
        assert_eq!(core.observer().idle_ticks(), 2);
    }

    #[test]
    fn reset_restores_constructed_state() {
        let pristine = core_with(&[(1, 0, 3), (2, 1, 2)]);
        let mut core = pristine.clone();
        core.start(Policy::RoundRobin, Some(1)).unwrap();
        core.tick().unwrap();
        core.tick().unwrap();

        core.reset();
        assert_eq!(core, pristine);
        core.reset();
        assert_eq!(core, pristine);
    }

    #[test]
    fn reset_allows_a_new_run_with_another_policy() {
        let mut core = core_with(&[(1, 0, 3), (2, 1, 2)]);
        core.start(Policy::Fcfs, None).unwrap();
        run(&mut core);
        core.reset();

        core.start(Policy::Srt, None).unwrap();
        run(&mut core);
        assert_eq!(core.now(), 5);
        assert_eq!(core.policy(), Some(Policy::Srt));
    }

    #[test]
    fn snapshot_flags_running_and_completed() {
        let mut core = core_with(&[(1, 0, 1), (2, 0, 2)]);
        core.start(Policy::Fcfs, None).unwrap();
        core.tick().unwrap();
        core.tick().unwrap();

        let snap = core.snapshot();
        assert_eq!(snap.clock, 2);
        assert_eq!(snap.state, EngineState::Running);
        assert_eq!(snap.running, Some(2));
        assert_eq!(snap.last_ran, Some(2));
        assert!(snap.processes[0].completed);
        assert!(!snap.processes[0].running);
        assert!(snap.processes[1].running);
        assert_eq!(snap.processes[1].remaining, 1);
        assert_eq!(snap.completed_count(), 1);
    }
}
