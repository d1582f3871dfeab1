use log::debug;
use serde::{Deserialize, Serialize};

use super::{ENQ_PREEMPT, EnqueueFlags, SchedParams, Scheduler, SimCtx, TaskId};
use crate::core::{DispatchKey, QueueId};

/// Frequency-scaling heuristic for light tasks.
///
/// A task whose burst is below `threshold_fraction` of the longest burst in
/// the run is modelled as running at a lower clock, so the utilization it
/// reports is multiplied by `scaling_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DvfsParams {
    pub threshold_fraction: f64,
    pub scaling_factor: f64,
}

impl Default for DvfsParams {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.5,
            scaling_factor: 0.6,
        }
    }
}

/// Green scheduling: SJF dispatch order, with DVFS-scaled utilization for
/// short tasks.
pub struct EnergyOptimizedScheduler {
    queue: QueueId,
    dvfs: DvfsParams,
    // Bursts strictly below this are scaled
    threshold: f64,
}

impl EnergyOptimizedScheduler {
    pub fn is_scaled(&self, burst: u64) -> bool {
        (burst as f64) < self.threshold
    }
}

impl Scheduler for EnergyOptimizedScheduler {
    fn init(ctx: &mut SimCtx, params: &SchedParams) -> Self {
        let threshold = params.dvfs.threshold_fraction * ctx.max_burst() as f64;
        debug!(
            "dvfs threshold {:.1} ticks, scaling factor {}",
            threshold, params.dvfs.scaling_factor
        );
        Self {
            queue: ctx.create_queue_priq(),
            dvfs: params.dvfs,
            threshold,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "energy-optimized runs tasks to completion");
        let key = DispatchKey::new(ctx.task(task).remaining, ctx.task(task));
        ctx.queue_push_priq(self.queue, task, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.queue_pop(self.queue)
    }

    fn utilization(&self, ctx: &SimCtx, task: TaskId) -> f64 {
        let task = ctx.task(task);
        if self.is_scaled(task.burst) {
            task.cpu_demand * self.dvfs.scaling_factor
        } else {
            task.cpu_demand
        }
    }
}
