use super::{ENQ_PREEMPT, EnqueueFlags, SchedParams, Scheduler, SimCtx, TaskId};
use crate::core::{DispatchKey, QueueId};

/// Shortest job first, non-preemptive. Ties go to the earlier arrival, then
/// the lower id.
pub struct SjfScheduler {
    queue: QueueId,
}

impl Scheduler for SjfScheduler {
    fn init(ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self {
            queue: ctx.create_queue_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "SJF runs tasks to completion");
        let key = DispatchKey::new(ctx.task(task).remaining, ctx.task(task));
        ctx.queue_push_priq(self.queue, task, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.queue_pop(self.queue)
    }
}
