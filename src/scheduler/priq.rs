use super::{ENQ_PREEMPT, EnqueueFlags, SchedParams, Scheduler, SimCtx, TaskId};
use crate::core::{DispatchKey, QueueId};

/// Static priority, non-preemptive. Lower value runs first.
pub struct PriorityScheduler {
    global_priq: QueueId,
}

impl Scheduler for PriorityScheduler {
    fn init(ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self {
            global_priq: ctx.create_queue_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "priority runs tasks to completion");
        let priority = u64::from(ctx.task(task).priority);
        let key = DispatchKey::new(priority, ctx.task(task));
        ctx.queue_push_priq(self.global_priq, task, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.queue_pop(self.global_priq)
    }
}
