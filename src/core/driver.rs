use std::collections::VecDeque;

use log::{debug, trace};

use super::{
    event::{ExecInterval, Timeline},
    observer::Observer,
    state::{SimCtx, Task, TaskId, TaskState},
};
use crate::scheduler::{ENQ_PREEMPT, ENQ_REENQ, ENQ_WAKEUP, EnqueueFlags, SchedParams, Scheduler};

/// Runs one policy over an owned task set on a single simulated CPU.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    timeline: Timeline,
    // Not-yet-arrived tasks, sorted by (arrival, id)
    arrivals: VecDeque<TaskId>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(tasks: Vec<Task>, params: &SchedParams) -> Self {
        let mut ctx = SimCtx::new(tasks);
        let scheduler = S::init(&mut ctx, params);

        let mut arrivals: Vec<TaskId> = ctx.tasks.iter().map(|t| t.id).collect();
        arrivals.sort_by_key(|&id| (ctx.task(id).arrival_time, id));

        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
            timeline: Timeline::new(),
            arrivals: arrivals.into(),
        }
    }

    /// Drive the run until every task has completed.
    pub fn run(mut self) -> (Timeline, Vec<Task>) {
        loop {
            self.admit_arrivals();

            if let Some(task) = self.scheduler.dispatch(&mut self.ctx) {
                self.run_slice(task);
            } else if let Some(&next) = self.arrivals.front() {
                // CPU idle until the next arrival
                let arrival = self.ctx.task(next).arrival_time;
                self.ctx.advance_to(arrival);
                continue;
            } else {
                break;
            }

            self.observer.observe(&self.ctx, &self.timeline);
        }

        debug_assert!(
            self.ctx.tasks.iter().all(Task::is_completed),
            "Run ended with unfinished tasks"
        );
        debug!(
            "run finished at t={} after {} slices",
            self.ctx.now,
            self.observer.steps()
        );

        (self.timeline, self.ctx.tasks)
    }

    fn run_slice(&mut self, task_id: TaskId) {
        let prev_state = self.ctx.set_running(task_id);
        debug_assert_eq!(prev_state, TaskState::Runnable);

        let remaining = self.ctx.task(task_id).remaining;
        let slice = self
            .scheduler
            .slice(&self.ctx, task_id)
            .max(1)
            .min(remaining);
        let utilization = self.scheduler.utilization(&self.ctx, task_id);

        let start = self.ctx.now;
        self.ctx.advance_time(slice);
        self.ctx.task_mut(task_id).remaining = remaining - slice;

        if slice > 0 {
            let interval = ExecInterval {
                task: task_id,
                start,
                end: self.ctx.now,
                utilization,
            };
            trace!("{:?}", interval);
            self.timeline.push(interval);
        }

        // Tasks that arrived during the slice queue up ahead of the one
        // being preempted.
        self.admit_arrivals();
        self.ctx.clear_cpu();

        if self.ctx.task(task_id).remaining == 0 {
            self.ctx.mark_completed(task_id, self.ctx.now);
        } else {
            self.ctx.mark_runnable(task_id);
            let flags: EnqueueFlags = ENQ_PREEMPT | ENQ_REENQ;
            self.scheduler.enqueue(&mut self.ctx, task_id, flags);
        }
    }

    fn admit_arrivals(&mut self) {
        let now = self.ctx.now;
        while let Some(&task_id) = self.arrivals.front() {
            if self.ctx.task(task_id).arrival_time > now {
                break;
            }
            self.arrivals.pop_front();
            self.ctx.mark_runnable(task_id);
            self.scheduler.enqueue(&mut self.ctx, task_id, ENQ_WAKEUP);
        }
    }
}
