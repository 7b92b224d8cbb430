pub mod config;
pub mod dataset;
pub mod error;
pub mod params;
pub mod runtime;
pub mod types;

pub use config::SimConfig;
pub use runtime::{run, run_with, RunSummary};
