pub mod fifo;
pub mod green;
pub mod priq;
pub mod round_robin;
pub mod sjf;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    core::{
        SchedCore, Timeline,
        state::{SimCtx, Task, TaskId, Ticks},
    },
    error::{Error, Result},
};
pub use fifo::FcfsScheduler;
pub use green::{DvfsParams, EnergyOptimizedScheduler};
pub use priq::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;

pub type EnqueueFlags = u64;

pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 32;
pub const ENQ_REENQ: EnqueueFlags = 1 << 40;

pub const DEFAULT_QUANTUM: Ticks = 100;

/// Knobs handed to every policy when a run starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedParams {
    pub quantum: Ticks,
    pub dvfs: DvfsParams,
}

impl Default for SchedParams {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            dvfs: DvfsParams::default(),
        }
    }
}

pub trait Scheduler {
    fn init(ctx: &mut SimCtx, params: &SchedParams) -> Self;

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags);

    /// Pick the next task to put on the CPU, or `None` if nothing is runnable.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId>;

    /// How long `task` may hold the CPU once dispatched. Runs to completion
    /// unless overridden.
    fn slice(&self, ctx: &SimCtx, task: TaskId) -> Ticks {
        ctx.task(task).remaining
    }

    /// Utilization reported for the interval `task` is about to run.
    fn utilization(&self, ctx: &SimCtx, task: TaskId) -> f64 {
        ctx.task(task).cpu_demand
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Algorithm {
    #[strum(serialize = "FCFS")]
    #[serde(rename = "FCFS")]
    Fcfs,
    #[strum(serialize = "SJF")]
    #[serde(rename = "SJF")]
    Sjf,
    RoundRobin,
    PriorityBased,
    EnergyOptimized,
}

impl Algorithm {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn from_name(name: &str) -> Result<Self> {
        name.trim()
            .parse()
            .map_err(|_| Error::unknown_algorithm(name))
    }

    /// Run this policy over `tasks`, which the run owns and mutates. The last
    /// arrival plus the sum of all bursts must fit in a tick count; configs
    /// built through `Config::validate` guarantee this.
    pub fn schedule(self, tasks: Vec<Task>, params: &SchedParams) -> (Timeline, Vec<Task>) {
        match self {
            Self::Fcfs => SchedCore::<FcfsScheduler>::new(tasks, params).run(),
            Self::Sjf => SchedCore::<SjfScheduler>::new(tasks, params).run(),
            Self::RoundRobin => SchedCore::<RoundRobinScheduler>::new(tasks, params).run(),
            Self::PriorityBased => SchedCore::<PriorityScheduler>::new(tasks, params).run(),
            Self::EnergyOptimized => {
                SchedCore::<EnergyOptimizedScheduler>::new(tasks, params).run()
            }
        }
    }
}
