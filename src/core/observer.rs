use super::{
    event::ExecInterval,
    state::{SimCtx, TaskState},
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx, timeline: &[ExecInterval]) {
        self.step += 1;

        if let Some(task_id) = ctx.current {
            debug_assert_eq!(
                ctx.task(task_id).state,
                TaskState::Running,
                "cpu.current task {task_id} must be Running"
            );
        }

        for task in &ctx.tasks {
            debug_assert!(
                task.remaining <= task.burst,
                "Task {} remaining {} exceeds burst {}",
                task.id,
                task.remaining,
                task.burst
            );
            if let Some(done) = task.completion_time {
                debug_assert!(
                    done >= task.arrival_time + task.burst,
                    "Task {} completed before it could have run its burst",
                    task.id
                );
            }
        }

        for (&task_id, &queue_id) in &ctx.task_to_queue {
            let task = ctx.task(task_id);
            debug_assert_ne!(
                task.state,
                TaskState::Completed,
                "Completed task {task_id} still present in queue {queue_id:?}"
            );
            debug_assert_ne!(
                task.state,
                TaskState::Running,
                "Running task {task_id} must not appear in any queue"
            );
            if let Some(queue) = ctx.queues.get(queue_id) {
                debug_assert!(
                    queue.contains(task_id),
                    "task_to_queue claims task {task_id} in queue {queue_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "task_to_queue references unknown queue {queue_id:?}");
            }
        }

        if let [.., prev, last] = timeline {
            debug_assert!(
                prev.end <= last.start,
                "Interval for task {} overlaps interval for task {}",
                last.task,
                prev.task
            );
        }
    }
}
