use super::{SchedCtx, Scheduler, Step, run_selected, select_min};

/// First-Come-First-Served: earliest arrival wins, then runs to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "FCFS";

    fn step(&mut self, ctx: &mut SchedCtx) -> Step {
        let selected = match ctx.running() {
            Some(index) if ctx.is_eligible(index) => Some(index),
            _ => select_min(ctx, |p| p.arrival),
        };
        run_selected(ctx, selected)
    }
}
