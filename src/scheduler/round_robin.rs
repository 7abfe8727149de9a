use super::{SchedCtx, Scheduler, Step};
use crate::core::{
    SchedError,
    state::{ProcIndex, Ticks},
};

/// Round-Robin over registry positions with a fixed quantum.
///
/// `last_index` is per-run state: a fresh scheduler is built at every run
/// start, so independent engines never share a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobinScheduler {
    quantum: Ticks,
    quantum_left: Ticks,
    last_index: Option<ProcIndex>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Result<Self, SchedError> {
        if quantum < 1 {
            return Err(SchedError::InvalidQuantum {
                quantum: Some(quantum),
            });
        }
        Ok(Self {
            quantum,
            quantum_left: 0,
            last_index: None,
        })
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    pub fn quantum_left(&self) -> Ticks {
        self.quantum_left
    }

    pub fn last_index(&self) -> Option<ProcIndex> {
        self.last_index
    }

    // Cyclic scan starting one past the last dispatched position
    fn next_eligible(&self, ctx: &SchedCtx) -> Option<ProcIndex> {
        let len = ctx.registry().len();
        if len == 0 {
            return None;
        }
        let start = self.last_index.map_or(0, |last| (last + 1) % len);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| ctx.is_eligible(index))
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "RR";

    fn step(&mut self, ctx: &mut SchedCtx) -> Step {
        if ctx.running().is_none() || self.quantum_left == 0 {
            match self.next_eligible(ctx) {
                Some(index) => {
                    self.quantum_left = self.quantum;
                    self.last_index = Some(index);
                    ctx.set_running(Some(index));
                }
                None => {
                    ctx.set_running(None);
                    return Step::IDLE;
                }
            }
        }

        let Some(index) = ctx.running() else {
            return Step::IDLE;
        };
        let terminated = ctx.run_one(index);
        self.quantum_left = self.quantum_left.saturating_sub(1);
        Step {
            selected: Some(index),
            terminated,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{ctx_with, timeline};

    #[test]
    fn rejects_zero_quantum() {
        assert_eq!(
            RoundRobinScheduler::new(0).unwrap_err(),
            SchedError::InvalidQuantum { quantum: Some(0) }
        );
    }

    #[test]
    fn alternates_every_quantum() {
        let mut ctx = ctx_with(&[(1, 0, 4), (2, 0, 4)]);
        let mut rr = RoundRobinScheduler::new(2).unwrap();
        let ran = timeline(&mut rr, &mut ctx);
        assert_eq!(
            ran,
            vec![
                Some(1),
                Some(1),
                Some(2),
                Some(2),
                Some(1),
                Some(1),
                Some(2),
                Some(2)
            ]
        );
    }

    #[test]
    fn lone_process_keeps_cpu_across_quanta() {
        let mut ctx = ctx_with(&[(1, 0, 5)]);
        let mut rr = RoundRobinScheduler::new(2).unwrap();
        let ran = timeline(&mut rr, &mut ctx);
        assert_eq!(ran, vec![Some(1); 5]);
    }

    #[test]
    fn early_finish_hands_over_on_next_tick() {
        let mut ctx = ctx_with(&[(1, 0, 1), (2, 0, 2)]);
        let mut rr = RoundRobinScheduler::new(3).unwrap();

        let step = rr.step(&mut ctx);
        assert!(step.terminated);
        assert_eq!(ctx.running(), None);
        assert_eq!(rr.quantum_left(), 2);

        ctx.advance_time(1);
        let step = rr.step(&mut ctx);
        assert_eq!(step.selected, Some(1));
        assert_eq!(rr.quantum_left(), 2);
        assert_eq!(rr.last_index(), Some(1));
    }

    #[test]
    fn skips_positions_that_have_not_arrived() {
        let mut ctx = ctx_with(&[(1, 0, 3), (2, 10, 1), (3, 0, 2)]);
        let mut rr = RoundRobinScheduler::new(1).unwrap();
        let ran = timeline(&mut rr, &mut ctx);
        assert_eq!(
            &ran[..5],
            &[Some(1), Some(3), Some(1), Some(3), Some(1)]
        );
        assert_eq!(ran[10], Some(2));
        assert!(ran[5..10].iter().all(Option::is_none));
    }
}
