use average::{Estimate, Mean};
use log::{debug, info, warn};

use super::{
    job::create_tasks,
    result::{AlgorithmResult, Comparison, TaskRecord},
};
use crate::{
    config::Config,
    core::{
        Task, Ticks,
        event::{ExecInterval, busy_time, makespan},
    },
    energy::{EnergyMeter, co2_for_energy, cost_for_energy},
    error::Result,
    scheduler::Algorithm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running(Algorithm),
    Aggregating(Algorithm),
    Done,
}

/// Runs each configured algorithm over its own copy of one task set and
/// turns the resulting timelines into energy and latency metrics.
#[derive(Debug)]
pub struct Simulator {
    config: Config,
    phase: EnginePhase,
}

impl Simulator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: EnginePhase::Idle,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn generate_tasks(&self) -> Vec<Task> {
        let cfg = &self.config;
        let tasks = create_tasks(
            cfg.tasks,
            cfg.duration,
            cfg.priority,
            cfg.cpu_demand,
            cfg.arrival,
            cfg.seed,
        );
        info!("Generated {} tasks (seed {})", tasks.len(), cfg.seed);
        tasks
    }

    pub fn run_all(&mut self) -> Comparison {
        let tasks = self.generate_tasks();
        self.run_with_tasks(&tasks)
    }

    /// Run every configured algorithm over `tasks`. Each run gets its own
    /// clone, so nothing one policy mutates is visible to the next.
    pub fn run_with_tasks(&mut self, tasks: &[Task]) -> Comparison {
        let algorithms = self.config.algorithms.clone();
        let results = algorithms
            .into_iter()
            .map(|algo| self.run_algorithm(algo, tasks))
            .collect();
        self.set_phase(EnginePhase::Done);
        Comparison::new(results)
    }

    pub fn run_algorithm(&mut self, algorithm: Algorithm, tasks: &[Task]) -> AlgorithmResult {
        self.set_phase(EnginePhase::Running(algorithm));

        if tasks.is_empty() {
            warn!("{algorithm}: empty task set, reporting zero metrics");
            self.set_phase(EnginePhase::Aggregating(algorithm));
            return AlgorithmResult::empty(algorithm);
        }

        let (timeline, finished) = algorithm.schedule(tasks.to_vec(), &self.config.sched_params());

        self.set_phase(EnginePhase::Aggregating(algorithm));
        let meter = self.integrate(&timeline);

        let records: Vec<TaskRecord> = finished.iter().filter_map(TaskRecord::from_task).collect();
        debug_assert_eq!(records.len(), finished.len(), "Every task must complete");

        let total_energy_kwh = meter.total_kwh();
        let result = AlgorithmResult {
            algorithm,
            total_energy_kwh,
            total_co2_kg: co2_for_energy(total_energy_kwh, self.config.emission_factor),
            total_cost: cost_for_energy(total_energy_kwh, self.config.cost_per_kwh),
            avg_wait: avg(records.iter().map(|r| r.wait as f64)),
            avg_turnaround: avg(records.iter().map(|r| r.turnaround as f64)),
            avg_power_watts: meter.avg_watts(),
            tasks_executed: records.len(),
            makespan: makespan(&timeline),
            busy_time: busy_time(&timeline),
            tasks: records,
            timeline,
            power_trace: meter.into_samples(),
        };

        info!(
            "{} completed: energy {:.6} kWh, CO2 {:.6} kg, avg wait {:.2}, avg turnaround {:.2}",
            algorithm,
            result.total_energy_kwh,
            result.total_co2_kg,
            result.avg_wait,
            result.avg_turnaround
        );

        result
    }

    fn integrate(&self, timeline: &[ExecInterval]) -> EnergyMeter {
        let mut meter = EnergyMeter::new(self.config.power_model());
        let mut cursor: Ticks = 0;

        for interval in timeline {
            if self.config.account_idle && interval.start > cursor {
                self.sample_span(&mut meter, cursor, interval.start, 0.0);
            }
            self.sample_span(&mut meter, interval.start, interval.end, interval.utilization);
            cursor = interval.end;
        }

        meter
    }

    // Split [start, end) into sampling-interval slices at a fixed utilization
    fn sample_span(&self, meter: &mut EnergyMeter, start: Ticks, end: Ticks, utilization: f64) {
        let tick = self.config.tick_seconds;
        let mut t = start;
        while t < end {
            let step = (end - t).min(self.config.sampling_interval);
            meter.record(t as f64 * tick, step as f64 * tick, utilization);
            t += step;
        }
    }

    fn set_phase(&mut self, phase: EnginePhase) {
        debug!("engine phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
