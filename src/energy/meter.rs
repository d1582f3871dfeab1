use serde::Serialize;

use super::model::{PowerModel, energy_for_interval};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerSample {
    /// Start of the sampled slice, in simulated seconds.
    pub time_secs: f64,
    pub duration_secs: f64,
    pub utilization: f64,
    pub power_watts: f64,
}

/// Integrates power over sampled slices of simulated time.
#[derive(Debug, Clone)]
pub struct EnergyMeter {
    model: PowerModel,
    energy_kwh: f64,
    elapsed_secs: f64,
    samples: Vec<PowerSample>,
}

impl EnergyMeter {
    pub fn new(model: PowerModel) -> Self {
        Self {
            model,
            energy_kwh: 0.0,
            elapsed_secs: 0.0,
            samples: Vec::new(),
        }
    }

    /// Account one slice at a constant utilization; returns its draw in watts.
    pub fn record(&mut self, time_secs: f64, duration_secs: f64, utilization: f64) -> f64 {
        let power_watts = self.model.power_draw(utilization);
        self.energy_kwh += energy_for_interval(power_watts, duration_secs);
        self.elapsed_secs += duration_secs;
        self.samples.push(PowerSample {
            time_secs,
            duration_secs,
            utilization,
            power_watts,
        });
        power_watts
    }

    pub fn total_kwh(&self) -> f64 {
        self.energy_kwh
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn avg_watts(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.energy_kwh * 3_600_000.0 / self.elapsed_secs
        } else {
            0.0
        }
    }

    pub fn samples(&self) -> &[PowerSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<PowerSample> {
        self.samples
    }
}
