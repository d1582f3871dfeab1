use serde::Serialize;

use crate::{
    core::{Task, TaskId, Ticks, Timeline},
    energy::PowerSample,
    scheduler::Algorithm,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u32,
    pub start: Ticks,
    pub completion: Ticks,
    pub wait: Ticks,
    pub turnaround: Ticks,
}

impl TaskRecord {
    /// `None` for a task that never completed.
    pub fn from_task(task: &Task) -> Option<Self> {
        Some(Self {
            id: task.id,
            arrival: task.arrival_time,
            burst: task.burst,
            priority: task.priority,
            start: task.start_time?,
            completion: task.completion_time?,
            wait: task.wait()?,
            turnaround: task.turnaround()?,
        })
    }
}

/// Aggregate metrics of one algorithm over one task set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmResult {
    pub algorithm: Algorithm,
    pub total_energy_kwh: f64,
    pub total_co2_kg: f64,
    pub total_cost: f64,
    pub avg_wait: f64,
    pub avg_turnaround: f64,
    pub avg_power_watts: f64,
    pub tasks_executed: usize,
    pub makespan: Ticks,
    pub busy_time: Ticks,
    pub tasks: Vec<TaskRecord>,
    pub timeline: Timeline,
    pub power_trace: Vec<PowerSample>,
}

impl AlgorithmResult {
    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            total_energy_kwh: 0.0,
            total_co2_kg: 0.0,
            total_cost: 0.0,
            avg_wait: 0.0,
            avg_turnaround: 0.0,
            avg_power_watts: 0.0,
            tasks_executed: 0,
            makespan: 0,
            busy_time: 0,
            tasks: Vec::new(),
            timeline: Timeline::new(),
            power_trace: Vec::new(),
        }
    }
}

/// Results of every configured algorithm over the same task set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    results: Vec<AlgorithmResult>,
}

impl Comparison {
    pub fn new(results: Vec<AlgorithmResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&AlgorithmResult> {
        self.results.iter().find(|r| r.algorithm == algorithm)
    }

    pub fn ranked_by_energy(&self) -> Vec<&AlgorithmResult> {
        self.ranked_by(|r| r.total_energy_kwh)
    }

    pub fn ranked_by_co2(&self) -> Vec<&AlgorithmResult> {
        self.ranked_by(|r| r.total_co2_kg)
    }

    pub fn best_energy(&self) -> Option<&AlgorithmResult> {
        self.ranked_by_energy().into_iter().next()
    }

    pub fn best_co2(&self) -> Option<&AlgorithmResult> {
        self.ranked_by_co2().into_iter().next()
    }

    // Stable, so ties keep configured order
    fn ranked_by(&self, metric: impl Fn(&AlgorithmResult) -> f64) -> Vec<&AlgorithmResult> {
        let mut ranked: Vec<_> = self.results.iter().collect();
        ranked.sort_by(|a, b| metric(a).total_cmp(&metric(b)));
        ranked
    }
}
