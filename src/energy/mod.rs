//! Synthetic power model and energy accounting.
//!
//! Power is a linear interpolation between idle and full-load draw; energy is
//! power integrated over simulated seconds, then converted to CO₂ and cost.

pub mod meter;
pub mod model;

pub use meter::{EnergyMeter, PowerSample};
pub use model::{PowerModel, co2_for_energy, cost_for_energy, energy_for_interval};
