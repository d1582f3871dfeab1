pub mod config;
pub mod core;
pub mod energy;
pub mod error;
pub mod export;
pub mod scheduler;
pub mod sim;

pub use config::{ArrivalModel, Bounds, Config, ConfigBuilder};
pub use error::{Error, Result};
pub use scheduler::{Algorithm, Scheduler};
pub use crate::core::Task;
pub use sim::{AlgorithmResult, Comparison, Simulator};
