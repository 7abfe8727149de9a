use super::error::SchedError;

pub type Pid = u32;
pub type Ticks = u64;

// Index into the registry Vec
pub type ProcIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    remaining: Ticks,
    start_time: Option<Ticks>,
    finish_time: Option<Ticks>,
}

impl Process {
    fn new(pid: Pid, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            pid,
            arrival,
            burst,
            remaining: burst,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn start_time(&self) -> Option<Ticks> {
        self.start_time
    }

    /// Clock value right after the tick in which `remaining` reached 0.
    pub fn finish_time(&self) -> Option<Ticks> {
        self.finish_time
    }

    pub fn is_completed(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_eligible(&self, now: Ticks) -> bool {
        self.arrival <= now && self.remaining > 0
    }

    fn restore(&mut self) {
        self.remaining = self.burst;
        self.start_time = None;
        self.finish_time = None;
    }
}

/// Insertion-ordered set of processes for one run.
///
/// Registry order is the scan order every policy uses and the last
/// tie-breaker when two processes are otherwise equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    processes: Vec<Process>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // PIDs are not checked for uniqueness
    pub fn add(&mut self, pid: Pid, arrival: Ticks, burst: Ticks) -> Result<&Process, SchedError> {
        if burst < 1 {
            return Err(SchedError::InvalidProcess { pid, burst });
        }
        let index = self.processes.len();
        self.processes.push(Process::new(pid, arrival, burst));
        Ok(&self.processes[index])
    }

    pub fn clear(&mut self) {
        self.processes.clear();
    }

    pub fn reset(&mut self) {
        self.processes.iter_mut().for_each(Process::restore);
    }

    pub fn all(&self) -> &[Process] {
        &self.processes
    }

    pub fn get(&self, index: ProcIndex) -> Option<&Process> {
        self.processes.get(index)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(Process::is_completed)
    }

    pub fn total_burst(&self) -> Ticks {
        self.processes.iter().map(|p| p.burst).sum()
    }
}

/// Engine state handed to a policy once per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedCtx {
    now: Ticks,
    running: Option<ProcIndex>,
    registry: Registry,
}

impl SchedCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn running(&self) -> Option<ProcIndex> {
        self.running
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn is_eligible(&self, index: ProcIndex) -> bool {
        self.registry
            .get(index)
            .is_some_and(|p| p.is_eligible(self.now))
    }

    pub fn eligible(&self) -> impl Iterator<Item = (ProcIndex, &Process)> {
        let now = self.now;
        self.registry
            .all()
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_eligible(now))
    }

    pub fn set_running(&mut self, index: Option<ProcIndex>) {
        debug_assert!(
            index.is_none_or(|i| self.is_eligible(i)),
            "Process at index {index:?} is not eligible at tick {}",
            self.now
        );
        self.running = index;
    }

    /// Make `index` the running process and charge it one unit of work.
    ///
    /// Returns true if the process completed during this tick, in which
    /// case `running` is cleared. An ineligible index is left untouched.
    pub fn run_one(&mut self, index: ProcIndex) -> bool {
        let now = self.now;
        let Some(process) = self.registry.processes.get_mut(index) else {
            debug_assert!(false, "run_one on unknown index {index}");
            return false;
        };
        if !process.is_eligible(now) {
            debug_assert!(false, "run_one on ineligible process {}", process.pid);
            return false;
        }

        self.running = Some(index);
        process.start_time.get_or_insert(now);
        process.remaining -= 1;

        if process.remaining == 0 {
            process.finish_time = Some(now.saturating_add(1));
            self.running = None;
            return true;
        }
        false
    }

    pub(crate) fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub(crate) fn rewind(&mut self) {
        self.now = 0;
        self.running = None;
    }
}
