pub mod driver;
pub mod error;
pub mod event;
pub mod observer;
pub mod snapshot;
pub mod state;

pub use driver::{EngineState, SchedCore};
pub use error::SchedError;
pub use event::SchedCoreEvent;
pub use observer::Observer;
pub use snapshot::{ProcessView, Snapshot};
pub use state::{Pid, ProcIndex, Process, Registry, SchedCtx, Ticks};
