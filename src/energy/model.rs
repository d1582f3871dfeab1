/// Seconds per hour times watts per kilowatt.
const WATT_SECONDS_PER_KWH: f64 = 3600.0 * 1000.0;

/// A power model based on linear interpolation between idle and maximum draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    idle_watts: f64,
    max_watts: f64,
}

impl PowerModel {
    /// * `idle_watts` - draw at 0% utilization.
    /// * `max_watts` - draw at 100% utilization.
    pub fn new(idle_watts: f64, max_watts: f64) -> Self {
        Self {
            idle_watts,
            max_watts,
        }
    }

    /// Instantaneous draw in watts. Utilization outside [0, 1] is clamped,
    /// since sampled values can drift slightly past the bounds.
    pub fn power_draw(&self, utilization: f64) -> f64 {
        let u = if utilization.is_nan() {
            0.0
        } else {
            utilization.clamp(0.0, 1.0)
        };
        // Weighted form keeps both endpoints exact
        (1.0 - u) * self.idle_watts + u * self.max_watts
    }
}

pub fn energy_for_interval(power_watts: f64, duration_secs: f64) -> f64 {
    power_watts * duration_secs / WATT_SECONDS_PER_KWH
}

pub fn co2_for_energy(kwh: f64, emission_factor: f64) -> f64 {
    kwh * emission_factor
}

pub fn cost_for_energy(kwh: f64, cost_per_kwh: f64) -> f64 {
    kwh * cost_per_kwh
}
