/*
Wires a simulation together: one registry, one task per subscription, one
task per publisher topic, all joined before returning.
*/
use std::collections::BTreeMap;
use std::sync::Arc;
use anyhow::{Context, Result};
use fanq::Registry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinSet;
use tracing::info;
use crate::config::SimConfig;
use crate::types::SharedRegistry;

mod publisher;
mod subscriber;

pub use publisher::{run_publisher, Pacing};
pub use subscriber::{run_subscriber, Transcript};

enum TaskOutcome {
    Published { topic: String, result: Result<usize> },
    Drained(Transcript),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// (subscriber, topic) -> messages in arrival order
    pub received: BTreeMap<(String, String), Vec<String>>,
    /// topic -> messages published
    pub published: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn received_by(&self, subscriber: &str) -> usize {
        self.received
            .iter()
            .filter(|((name, _), _)| name == subscriber)
            .map(|(_, msgs)| msgs.len())
            .sum()
    }
}

/// Runs the whole simulation and waits until every task is done.
///
/// Subscriptions are registered before any publisher starts, so every
/// subscriber sees every message of its topics.
pub async fn run(config: &SimConfig) -> Result<RunSummary> {
    let registry: SharedRegistry = Arc::new(Registry::with_config(config.registry.clone()));
    run_with(config, registry).await
}

/// Same as [`run`] against a registry built by the caller.
pub async fn run_with(config: &SimConfig, registry: SharedRegistry) -> Result<RunSummary> {
    config.validate()?;
    let (min, max) = config.delay_window();
    let pacing = Pacing { min, max };

    let mut tasks = JoinSet::new();

    for (name, topics) in &config.subscribers {
        for topic in topics {
            let subscription = registry.subscribe(topic).await;
            let name = name.clone();
            tasks.spawn(async move { TaskOutcome::Drained(run_subscriber(name, subscription).await) });
        }
    }
    info!(subscriptions = config.subscription_count(), "subscribers registered");

    for (index, (topic, messages)) in config.publishers.iter().enumerate() {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        };
        let registry = Arc::clone(&registry);
        let topic = topic.clone();
        let messages = messages.clone();
        tasks.spawn(async move {
            let result = run_publisher(registry, topic.clone(), messages, pacing, rng).await;
            TaskOutcome::Published { topic, result }
        });
    }
    info!(publishers = config.publishers.len(), "publishers started");

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined.context("simulation task panicked")? {
            TaskOutcome::Published { topic, result } => {
                let count = result.with_context(|| format!("publisher for {topic:?} failed"))?;
                summary.published.insert(topic, count);
            }
            TaskOutcome::Drained(transcript) => {
                summary
                    .received
                    .insert((transcript.subscriber, transcript.topic), transcript.messages);
            }
        }
    }

    info!(topics = summary.published.len(), subscriptions = summary.received.len(), "simulation complete");
    Ok(summary)
}
