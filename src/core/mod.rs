pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::{ExecInterval, Timeline};
pub use state::{DispatchKey, QueueId, SimCtx, Task, TaskId, TaskQueue, TaskState, Ticks};
