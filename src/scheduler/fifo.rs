use super::{ENQ_PREEMPT, EnqueueFlags, SchedParams, Scheduler, SimCtx, TaskId};

/// First come, first served: one FIFO queue fed in arrival order, each task
/// runs its whole burst.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    fn init(_ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "FCFS never preempts");
        let queue = ctx.global_queue();
        ctx.queue_push_fifo(queue, task);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        let queue = ctx.global_queue();
        ctx.queue_pop(queue)
    }
}
