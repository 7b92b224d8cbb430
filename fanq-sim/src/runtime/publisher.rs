use std::time::Duration;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};
use crate::types::SharedRegistry;

/// Random pause before each publish, drawn from `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Pacing {
    pub fn next_delay(&self, rng: &mut StdRng) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let ms = rng.gen_range(self.min.as_millis() as u64..=self.max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

/// Publishes `messages` to `topic` one at a time, then closes the topic.
/// Returns how many messages went out.
pub async fn run_publisher(
    registry: SharedRegistry,
    topic: String,
    messages: Vec<String>,
    pacing: Pacing,
    mut rng: StdRng,
) -> Result<usize> {
    let mut published = 0;
    for message in messages {
        tokio::time::sleep(pacing.next_delay(&mut rng)).await;
        let report = registry.publish(&topic, message).await?;
        debug!(topic = %topic, delivered = report.delivered, unreadable = report.unreadable, timed_out = report.timed_out, "published");
        published += 1;
    }
    let closed = registry.close(&topic).await;
    info!(topic = %topic, published, closed, "publisher finished");
    Ok(published)
}
