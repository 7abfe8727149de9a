use super::{SchedCtx, Scheduler, Step, run_selected, select_min};

/// Shortest-Job-Next: smallest burst wins once the CPU is free, then runs
/// to completion. Ties go to the earlier arrival.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SjnScheduler;

impl Scheduler for SjnScheduler {
    const NAME: &'static str = "SJN";

    fn step(&mut self, ctx: &mut SchedCtx) -> Step {
        let selected = match ctx.running() {
            Some(index) if ctx.is_eligible(index) => Some(index),
            _ => select_min(ctx, |p| (p.burst, p.arrival)),
        };
        run_selected(ctx, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{ctx_with, timeline};

    #[test]
    fn picks_shortest_burst_among_arrived() {
        let mut ctx = ctx_with(&[(1, 0, 3), (2, 0, 1), (3, 0, 2)]);
        let ran = timeline(&mut SjnScheduler, &mut ctx);
        assert_eq!(
            ran,
            vec![Some(2), Some(3), Some(3), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn shorter_arrival_does_not_preempt() {
        let mut ctx = ctx_with(&[(1, 0, 4), (2, 1, 1)]);
        let ran = timeline(&mut SjnScheduler, &mut ctx);
        assert_eq!(ran, vec![Some(1), Some(1), Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn burst_tie_goes_to_earlier_arrival() {
        let mut ctx = ctx_with(&[(1, 0, 5), (2, 2, 2), (3, 1, 2)]);
        let ran = timeline(&mut SjnScheduler, &mut ctx);
        assert_eq!(&ran[5..], &[Some(3), Some(3), Some(2), Some(2)]);
    }
}
