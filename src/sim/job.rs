use rand::prelude::*;

use crate::{
    config::{ArrivalModel, Bounds},
    core::state::{Task, Ticks},
};

/// Generate `count` tasks with uniformly sampled burst, priority and CPU
/// demand. The result is sorted by arrival and ids follow that order.
pub fn create_tasks(
    count: usize,
    duration: Bounds<Ticks>,
    priority: Bounds<u32>,
    cpu_demand: Bounds<f64>,
    arrival: ArrivalModel,
    seed: u64,
) -> Vec<Task> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut clock: Ticks = 0;
    let mut tasks = Vec::with_capacity(count);

    for id in 0..count {
        let burst = rng.random_range(duration.min..=duration.max);
        let prio = rng.random_range(priority.min..=priority.max);
        let demand = rng.random_range(cpu_demand.min..=cpu_demand.max);
        let arrival_time = match arrival {
            ArrivalModel::AllAtZero => 0,
            ArrivalModel::Uniform { horizon } => rng.random_range(0..=horizon),
            ArrivalModel::Staggered { max_gap } => {
                clock = clock.saturating_add(rng.random_range(0..=max_gap));
                clock
            }
        };

        tasks.push(Task::new(id, arrival_time, burst, prio, demand));
    }

    tasks.sort_by_key(|t| (t.arrival_time, t.id));
    for (id, task) in tasks.iter_mut().enumerate() {
        task.id = id;
    }

    tasks
}

/// Build tasks from explicit `(arrival, burst, priority)` triples, all at
/// full CPU demand.
pub fn tasks_from_specs(specs: &[(Ticks, Ticks, u32)]) -> Vec<Task> {
    specs
        .iter()
        .enumerate()
        .map(|(id, &(arrival, burst, priority))| Task::new(id, arrival, burst, priority, 1.0))
        .collect()
}
