use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    core::Ticks,
    energy::PowerModel,
    error::{Error, Result},
    scheduler::{Algorithm, DEFAULT_QUANTUM, DvfsParams, SchedParams},
};

/// Inclusive `[min, max]` range that task attributes are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalModel {
    /// Every task is ready at t=0.
    AllAtZero,
    /// Arrivals drawn uniformly from `[0, horizon]`.
    Uniform { horizon: Ticks },
    /// Each task arrives up to `max_gap` ticks after the previous one.
    Staggered { max_gap: Ticks },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tasks: usize,
    pub duration: Bounds<Ticks>,
    pub priority: Bounds<u32>,
    pub cpu_demand: Bounds<f64>,
    pub arrival: ArrivalModel,
    pub seed: u64,

    pub idle_watts: f64,
    pub max_watts: f64,
    /// kg CO₂e per kWh.
    pub emission_factor: f64,
    pub cost_per_kwh: f64,

    pub quantum: Ticks,
    pub sampling_interval: Ticks,
    /// Length of one simulated tick in seconds.
    pub tick_seconds: f64,
    pub dvfs: DvfsParams,
    /// Charge idle power for gaps where no task holds the CPU.
    pub account_idle: bool,

    pub algorithms: Vec<Algorithm>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks: 20,
            duration: Bounds::new(500, 5_000),
            priority: Bounds::new(1, 3),
            cpu_demand: Bounds::new(0.1, 1.0),
            arrival: ArrivalModel::Uniform { horizon: 30_000 },
            seed: 42,

            idle_watts: 5.0,
            max_watts: 15.0,
            emission_factor: 0.73,
            cost_per_kwh: 8.0,

            quantum: DEFAULT_QUANTUM,
            sampling_interval: 1_000,
            tick_seconds: 0.001,
            dvfs: DvfsParams::default(),
            account_idle: true,

            algorithms: Algorithm::all(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load a JSON config; absent fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.idle_watts.is_finite() && self.max_watts.is_finite()) {
            return Err(Error::config("power values must be finite"));
        }
        if self.idle_watts < 0.0 || self.max_watts < 0.0 {
            return Err(Error::config("power values must be >= 0"));
        }
        if self.idle_watts > self.max_watts {
            return Err(Error::config(format!(
                "idle_watts ({}) must not exceed max_watts ({})",
                self.idle_watts, self.max_watts
            )));
        }

        if self.duration.min == 0 || self.duration.min > self.duration.max {
            return Err(Error::config(
                "duration range must satisfy 0 < min <= max",
            ));
        }
        if self.latest_completion().is_none() {
            return Err(Error::config(
                "arrival horizon plus total task duration overflows the tick clock",
            ));
        }
        if self.priority.min > self.priority.max {
            return Err(Error::config("priority range must satisfy min <= max"));
        }
        let demand = self.cpu_demand;
        if !(0.0..=1.0).contains(&demand.min)
            || !(0.0..=1.0).contains(&demand.max)
            || demand.min > demand.max
        {
            return Err(Error::config(
                "cpu_demand range must lie within [0, 1] with min <= max",
            ));
        }

        if self.quantum == 0 {
            return Err(Error::config("quantum must be > 0"));
        }
        if self.sampling_interval == 0 {
            return Err(Error::config("sampling_interval must be > 0"));
        }
        if !(self.tick_seconds > 0.0 && self.tick_seconds.is_finite()) {
            return Err(Error::config("tick_seconds must be > 0"));
        }
        if !(self.emission_factor >= 0.0 && self.emission_factor.is_finite())
            || !(self.cost_per_kwh >= 0.0 && self.cost_per_kwh.is_finite())
        {
            return Err(Error::config(
                "emission_factor and cost_per_kwh must be finite and >= 0",
            ));
        }

        let dvfs = self.dvfs;
        if !(dvfs.threshold_fraction > 0.0 && dvfs.threshold_fraction <= 1.0) {
            return Err(Error::config("dvfs threshold_fraction must be in (0, 1]"));
        }
        if !(dvfs.scaling_factor > 0.0 && dvfs.scaling_factor <= 1.0) {
            return Err(Error::config("dvfs scaling_factor must be in (0, 1]"));
        }

        if self.algorithms.is_empty() {
            return Err(Error::config("at least one algorithm must be configured"));
        }

        Ok(())
    }

    /// Upper bound on when the last generated task can finish, or `None`
    /// if it does not fit in a tick count.
    fn latest_completion(&self) -> Option<Ticks> {
        let count = Ticks::try_from(self.tasks).ok()?;
        let last_arrival = match self.arrival {
            ArrivalModel::AllAtZero => 0,
            ArrivalModel::Uniform { horizon } => horizon,
            ArrivalModel::Staggered { max_gap } => max_gap.checked_mul(count)?,
        };
        count
            .checked_mul(self.duration.max)?
            .checked_add(last_arrival)
    }

    pub fn power_model(&self) -> PowerModel {
        PowerModel::new(self.idle_watts, self.max_watts)
    }

    pub fn sched_params(&self) -> SchedParams {
        SchedParams {
            quantum: self.quantum,
            dvfs: self.dvfs,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn tasks(mut self, n: usize) -> Self {
        self.config.tasks = n;
        self
    }

    pub fn duration(mut self, min: Ticks, max: Ticks) -> Self {
        self.config.duration = Bounds::new(min, max);
        self
    }

    pub fn priority(mut self, min: u32, max: u32) -> Self {
        self.config.priority = Bounds::new(min, max);
        self
    }

    pub fn cpu_demand(mut self, min: f64, max: f64) -> Self {
        self.config.cpu_demand = Bounds::new(min, max);
        self
    }

    pub fn arrival(mut self, model: ArrivalModel) -> Self {
        self.config.arrival = model;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn power(mut self, idle_watts: f64, max_watts: f64) -> Self {
        self.config.idle_watts = idle_watts;
        self.config.max_watts = max_watts;
        self
    }

    pub fn emission_factor(mut self, kg_per_kwh: f64) -> Self {
        self.config.emission_factor = kg_per_kwh;
        self
    }

    pub fn cost_per_kwh(mut self, cost: f64) -> Self {
        self.config.cost_per_kwh = cost;
        self
    }

    pub fn quantum(mut self, quantum: Ticks) -> Self {
        self.config.quantum = quantum;
        self
    }

    pub fn sampling_interval(mut self, interval: Ticks) -> Self {
        self.config.sampling_interval = interval;
        self
    }

    pub fn tick_seconds(mut self, secs: f64) -> Self {
        self.config.tick_seconds = secs;
        self
    }

    pub fn dvfs(mut self, threshold_fraction: f64, scaling_factor: f64) -> Self {
        self.config.dvfs = DvfsParams {
            threshold_fraction,
            scaling_factor,
        };
        self
    }

    pub fn account_idle(mut self, enable: bool) -> Self {
        self.config.account_idle = enable;
        self
    }

    pub fn algorithms<I: IntoIterator<Item = Algorithm>>(mut self, algorithms: I) -> Self {
        self.config.algorithms = algorithms.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
