use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use fanq::{Registry, REGISTRY_CONFIG};
use fanq_sim::params::Params;
use fanq_sim::{runtime, SimConfig};
use tracing::{info, warn};

// cargo run -p fanq-sim -- --min-delay-ms 100 --max-delay-ms 500

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();

    tracing_subscriber::fmt()
        .with_max_level(params.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    let mut config = SimConfig::load_or_default(params.config.as_ref())?;
    params.apply(&mut config)?;
    if REGISTRY_CONFIG.set(config.registry.clone()).is_err() {
        warn!("registry config was already installed, keeping the existing one");
    }

    info!(
        publishers = config.publishers.len(),
        subscriptions = config.subscription_count(),
        min_delay_ms = config.min_delay_ms,
        max_delay_ms = config.max_delay_ms,
        "fanq-sim starting"
    );

    let summary = runtime::run_with(&config, Arc::new(Registry::new())).await?;
    for (topic, count) in &summary.published {
        info!(topic = %topic, count, "published");
    }
    for name in config.subscribers.keys() {
        info!(subscriber = %name, received = summary.received_by(name), "received");
    }
    Ok(())
}
