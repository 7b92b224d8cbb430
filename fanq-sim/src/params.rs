use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use fanq::RegistryConfig;
use tracing::Level;
use crate::config::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "fanq-sim", about = "Runs publishers and subscribers against one in-process registry")]
pub struct Params {
    /// TOML file with publishers, subscribers and registry knobs.
    #[arg(long, env = "FANQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Standalone registry TOML; replaces the `[registry]` table of `--config`.
    #[arg(long, env = "FANQ_REGISTRY_CONFIG")]
    pub registry_config: Option<PathBuf>,

    #[arg(long, env = "FANQ_MIN_DELAY_MS")]
    pub min_delay_ms: Option<u64>,

    #[arg(long, env = "FANQ_MAX_DELAY_MS")]
    pub max_delay_ms: Option<u64>,

    /// Fixes publish pacing so runs are reproducible.
    #[arg(long, env = "FANQ_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "FANQ_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
}

impl Params {
    /// Command line values win over the file.
    pub fn apply(&self, config: &mut SimConfig) -> Result<()> {
        if let Some(ms) = self.min_delay_ms {
            config.min_delay_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.max_delay_ms = ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(path) = &self.registry_config {
            config.registry = RegistryConfig::load_or_default(Some(path))
                .with_context(|| format!("loading registry config {:?}", path))?;
        }
        Ok(())
    }
}
