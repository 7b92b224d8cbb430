use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};
use crate::config::RegistryConfig;
use crate::core::constants::{DEFAULT_TOPIC_CAPACITY, FIRST_SUBSCRIPTION_ID};
use crate::core::endpoint::{endpoint, EndpointSender, Handoff, Subscription};
use crate::core::error::PubSubError;
use crate::registry_config;

/// What happened to one published message across a topic's endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub unreadable: usize,
    pub timed_out: usize,
}

impl PublishReport {
    pub fn total(&self) -> usize {
        self.delivered + self.unreadable + self.timed_out
    }
}

#[derive(Default)]
struct TopicMap {
    open: HashMap<String, Vec<EndpointSender>>,
    // topics closed and not subscribed to since
    closed: HashSet<String>,
}

/// Topic registry and fan-out point.
///
/// A single lock guards the whole map and is held for the full duration of a
/// publish, so a subscriber that is slow to read on one topic stalls every
/// other topic until its handoff completes.
pub struct Registry {
    topics: Mutex<TopicMap>,
    next_id: AtomicU64,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(registry_config().clone())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Registry {
            topics: Mutex::new(TopicMap::default()),
            next_id: AtomicU64::new(FIRST_SUBSCRIPTION_ID),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a new endpoint on `topic` and returns its receiving half.
    ///
    /// Subscribing to a closed topic reopens it with a fresh sequence.
    pub async fn subscribe(&self, topic: &str) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, subscription) = endpoint(id, topic);

        let mut topics = self.topics.lock().await;
        if topics.closed.remove(topic) {
            debug!(topic = %topic, "reopening closed topic");
        }
        let endpoints = topics
            .open
            .entry(topic.to_string())
            .or_insert_with(|| Vec::with_capacity(DEFAULT_TOPIC_CAPACITY));
        endpoints.push(sender);
        debug!(topic = %topic, subscription = id, subscribers = endpoints.len(), "subscribed");

        subscription
    }

    /// Hands `message` to every endpoint of `topic`, one after another, holding
    /// the registry lock throughout.
    pub async fn publish(
        &self,
        topic: &str,
        message: impl Into<String>,
    ) -> Result<PublishReport, PubSubError> {
        let message = message.into();
        let topics = self.topics.lock().await;

        let Some(endpoints) = topics.open.get(topic) else {
            if topics.closed.contains(topic) {
                warn!(topic = %topic, "publish on closed topic");
                return Err(PubSubError::TopicClosed(topic.to_string()));
            }
            trace!(topic = %topic, "publish with no subscribers");
            return Ok(PublishReport::default());
        };

        let mut report = PublishReport::default();
        for sender in endpoints {
            let handoff = match self.config.handoff_timeout {
                Some(limit) => {
                    let taken_before = sender.taken_count();
                    match tokio::time::timeout(limit, sender.send(message.clone())).await {
                        Ok(handoff) => handoff,
                        // reader took it as the deadline fired
                        Err(_) if sender.taken_count() > taken_before => Handoff::Accepted,
                        Err(_) => {
                            warn!(
                                topic = %topic,
                                subscription = sender.id(),
                                ?limit,
                                "handoff timed out, skipping subscriber"
                            );
                            report.timed_out += 1;
                            continue;
                        }
                    }
                }
                None => sender.send(message.clone()).await,
            };
            match handoff {
                Handoff::Accepted => report.delivered += 1,
                Handoff::Unreadable => report.unreadable += 1,
            }
        }

        trace!(topic = %topic, ?report, "published");
        Ok(report)
    }

    /// Closes every endpoint of `topic` and releases them. Returns how many were closed.
    ///
    /// Only a topic that had endpoints is remembered as closed; closing an
    /// already-closed or unknown topic changes nothing.
    pub async fn close(&self, topic: &str) -> usize {
        let mut topics = self.topics.lock().await;
        let Some(endpoints) = topics.open.remove(topic) else {
            debug!(topic = %topic, "close on topic with no open endpoints");
            return 0;
        };
        let closed = endpoints.len();
        for sender in endpoints {
            sender.close();
        }
        topics.closed.insert(topic.to_string());
        debug!(topic = %topic, endpoints = closed, "closed topic");
        closed
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .await
            .open
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Topics that currently have open endpoints, sorted.
    pub async fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.lock().await.open.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_uses_process_wide_config() {
        let registry = Registry::new();
        assert_eq!(registry.config(), crate::registry_config());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_noop() {
        let registry = Registry::with_config(RegistryConfig::default());
        let report = registry.publish("nobody", "hi").await.unwrap();
        assert_eq!(report, PublishReport::default());
        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn subscribe_grows_topic_sequence() {
        let registry = Registry::with_config(RegistryConfig::default());
        let a = registry.subscribe("X").await;
        let b = registry.subscribe("X").await;
        let _c = registry.subscribe("Y").await;

        assert_eq!(registry.subscriber_count("X").await, 2);
        assert_eq!(registry.subscriber_count("Y").await, 1);
        assert_eq!(registry.subscriber_count("Z").await, 0);
        assert_eq!(registry.topics().await, vec!["X".to_string(), "Y".to_string()]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.topic(), "X");
    }

    #[tokio::test]
    async fn topic_names_are_case_sensitive() {
        let registry = Registry::with_config(RegistryConfig::default());
        let _lower = registry.subscribe("dogs").await;
        assert_eq!(registry.subscriber_count("Dogs").await, 0);
        assert_eq!(registry.close("Dogs").await, 0);
        assert_eq!(registry.subscriber_count("dogs").await, 1);
    }

    #[tokio::test]
    async fn close_releases_endpoints() {
        let registry = Registry::with_config(RegistryConfig::default());
        let mut sub = registry.subscribe("X").await;

        assert_eq!(registry.close("X").await, 1);
        assert_eq!(registry.subscriber_count("X").await, 0);
        assert!(registry.topics().await.is_empty());
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn close_unknown_topic_is_noop() {
        let registry = Registry::with_config(RegistryConfig::default());
        assert_eq!(registry.close("ghost").await, 0);
        assert_eq!(registry.close("ghost").await, 0);
    }

    #[tokio::test]
    async fn closing_unknown_topics_leaves_no_tombstones() {
        let registry = Registry::with_config(RegistryConfig::default());
        for i in 0..100 {
            assert_eq!(registry.close(&format!("unused-{i}")).await, 0);
        }
        assert!(registry.topics.lock().await.closed.is_empty());

        let _sub = registry.subscribe("used").await;
        registry.close("used").await;
        assert_eq!(registry.topics.lock().await.closed.len(), 1);
    }

    #[tokio::test]
    async fn subscription_ids_are_unique_and_start_at_one() {
        let registry = Registry::with_config(RegistryConfig::default());
        let first = registry.subscribe("a").await;
        let second = registry.subscribe("b").await;
        assert_eq!(first.id(), FIRST_SUBSCRIPTION_ID);
        assert_eq!(second.id(), FIRST_SUBSCRIPTION_ID + 1);
    }
}
