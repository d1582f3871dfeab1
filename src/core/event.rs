use serde::Serialize;

use crate::core::{TaskId, Ticks};

/// One stretch of CPU time held by a single task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExecInterval {
    pub task: TaskId,
    pub start: Ticks,
    pub end: Ticks,
    pub utilization: f64,
}

impl ExecInterval {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

pub type Timeline = Vec<ExecInterval>;

pub fn busy_time(timeline: &[ExecInterval]) -> Ticks {
    timeline.iter().map(ExecInterval::duration).sum()
}

pub fn makespan(timeline: &[ExecInterval]) -> Ticks {
    timeline.last().map_or(0, |interval| interval.end)
}
