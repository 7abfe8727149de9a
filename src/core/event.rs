use crate::core::{Pid, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedCoreEvent {
    // CPU handed to a process that was not running on the previous tick
    Dispatched {
        pid: Pid,
    },
    Preempted {
        pid: Pid,
        by: Pid,
    },
    Ran {
        pid: Pid,
        remaining: Ticks,
    },
    ProcessCompleted {
        pid: Pid,
        finish_time: Ticks,
    },
    // No eligible process this tick
    CpuIdle,
    RunCompleted {
        clock: Ticks,
    },
}
