use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use fanq::RegistryConfig;
use serde::{Deserialize, Serialize};
use crate::dataset::{default_publishers, default_subscribers};
use crate::error::SimError;

/// Everything one simulation run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Lower bound of the pause before each publish.
    pub min_delay_ms: u64,

    /// Upper bound of the pause before each publish.
    pub max_delay_ms: u64,

    /// `None` = seed pacing from OS entropy.
    pub seed: Option<u64>,

    /// topic -> messages, published in order and then closed.
    pub publishers: BTreeMap<String, Vec<String>>,

    /// subscriber name -> topics it listens on.
    pub subscribers: BTreeMap<String, Vec<String>>,

    pub registry: RegistryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1_000,
            max_delay_ms: 10_000,
            seed: None,
            publishers: default_publishers(),
            subscribers: default_subscribers(),
            registry: RegistryConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::read_from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {:?}", path.as_ref()))?;
        let cfg: SimConfig = toml::from_str(&raw)
            .with_context(|| "parsing simulation config TOML")?;
        Ok(cfg)
    }

    /// Rejects setups that could never finish (every subscribed topic needs a
    /// publisher, since only the publisher closes it) and subscribers that list
    /// a topic twice, since one subscriber gets one transcript per topic.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(SimError::DelayWindow {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        for (subscriber, topics) in &self.subscribers {
            let mut seen: HashSet<&str> = HashSet::new();
            for topic in topics {
                if !seen.insert(topic.as_str()) {
                    return Err(SimError::DuplicateTopic {
                        subscriber: subscriber.clone(),
                        topic: topic.clone(),
                    });
                }
            }
            if let Some(topic) = topics.iter().find(|t| !self.publishers.contains_key(*t)) {
                return Err(SimError::OrphanTopic {
                    subscriber: subscriber.clone(),
                    topic: topic.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn delay_window(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    pub fn subscription_count(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }
}
