use super::{SchedCtx, Scheduler, Step, run_selected, select_min};

/// Shortest-Remaining-Time: re-evaluated every tick, so a newly arrived
/// shorter process preempts the running one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrtScheduler;

impl Scheduler for SrtScheduler {
    const NAME: &'static str = "SRT";

    fn step(&mut self, ctx: &mut SchedCtx) -> Step {
        let selected = select_min(ctx, |p| (p.remaining(), p.arrival));
        run_selected(ctx, selected)
    }
}
