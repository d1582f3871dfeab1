use log::trace;

use super::{ENQ_PREEMPT, EnqueueFlags, SchedParams, Scheduler, SimCtx, TaskId, Ticks};

/// Fixed-quantum round robin over one FIFO queue.
///
/// A task whose slice expires goes to the tail. The driver admits tasks that
/// arrived during that slice first, so they run ahead of the preempted task.
pub struct RoundRobinScheduler {
    quantum: Ticks,
    preemptions: u64,
}

impl RoundRobinScheduler {
    /// Slices that ended with the task still unfinished.
    pub fn preemptions(&self) -> u64 {
        self.preemptions
    }
}

impl Scheduler for RoundRobinScheduler {
    fn init(_ctx: &mut SimCtx, params: &SchedParams) -> Self {
        Self {
            quantum: params.quantum.max(1),
            preemptions: 0,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        if flags & ENQ_PREEMPT != 0 {
            let remaining = ctx.task(task).remaining;
            debug_assert!(remaining > 0, "Finished task {task} re-enqueued");
            trace!("task {task} preempted at t={} with {remaining} left", ctx.now);
            self.preemptions += 1;
        }
        let queue = ctx.global_queue();
        ctx.queue_push_fifo(queue, task);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        let queue = ctx.global_queue();
        ctx.queue_pop(queue)
    }

    fn slice(&self, ctx: &SimCtx, task: TaskId) -> Ticks {
        self.quantum.min(ctx.task(task).remaining)
    }
}
