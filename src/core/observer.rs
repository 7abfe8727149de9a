use rustc_hash::FxHashMap;

use super::state::{Pid, ProcIndex, SchedCtx, Ticks};
use crate::scheduler::Step;

/// Records what ran at every tick and checks registry invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observer {
    timeline: Vec<Option<Pid>>,
    // (index, consecutive ticks) of the process that ran on the last tick
    streak: Option<(ProcIndex, Ticks)>,
    longest_streaks: FxHashMap<ProcIndex, Ticks>,
    dispatches: FxHashMap<ProcIndex, u64>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, ctx: &SchedCtx, step: Step) {
        let pid = step
            .selected
            .and_then(|index| ctx.registry().get(index))
            .map(|p| p.pid);
        self.timeline.push(pid);

        match (step.selected, self.streak) {
            (Some(index), Some((last, run))) if last == index => {
                self.streak = Some((index, run + 1));
            }
            (Some(index), _) => {
                self.streak = Some((index, 1));
                *self.dispatches.entry(index).or_default() += 1;
            }
            (None, _) => self.streak = None,
        }
        if let Some((index, run)) = self.streak {
            let longest = self.longest_streaks.entry(index).or_default();
            *longest = (*longest).max(run);
        }
        // A completed process must be re-dispatched from scratch, never extended
        if step.terminated {
            self.streak = None;
        }

        for process in ctx.registry().all() {
            debug_assert!(
                process.remaining() <= process.burst,
                "Process {} remaining {} exceeds burst {}",
                process.pid,
                process.remaining(),
                process.burst
            );
        }

        if let Some(index) = ctx.running() {
            debug_assert_eq!(
                step.selected,
                Some(index),
                "running index {index} was not the process charged this tick"
            );
            debug_assert!(
                ctx.registry().get(index).is_some_and(|p| !p.is_completed()),
                "running index {index} must not be completed"
            );
        }

        if step.terminated {
            debug_assert!(
                ctx.running().is_none(),
                "completed process still marked running"
            );
        }
    }

    /// Pid charged at each tick, `None` for idle ticks.
    pub fn timeline(&self) -> &[Option<Pid>] {
        &self.timeline
    }

    pub fn idle_ticks(&self) -> usize {
        self.timeline.iter().filter(|pid| pid.is_none()).count()
    }

    /// Most consecutive ticks the process at `index` ran without yielding.
    pub fn longest_streak(&self, index: ProcIndex) -> Ticks {
        self.longest_streaks.get(&index).copied().unwrap_or(0)
    }

    /// Number of separate stints the process at `index` was given the CPU.
    pub fn dispatch_count(&self, index: ProcIndex) -> u64 {
        self.dispatches.get(&index).copied().unwrap_or(0)
    }
}
