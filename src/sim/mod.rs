pub mod driver;
pub mod job;
pub mod result;

pub use driver::{EnginePhase, Simulator};
pub use job::{create_tasks, tasks_from_specs};
pub use result::{AlgorithmResult, Comparison, TaskRecord};
