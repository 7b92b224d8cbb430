use fanq::Subscription;
use tracing::debug;

/// Everything one subscriber saw on one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub subscriber: String,
    pub topic: String,
    pub messages: Vec<String>,
}

/// Reads until end-of-stream, echoing each message to stdout.
pub async fn run_subscriber(name: String, mut subscription: Subscription) -> Transcript {
    let mut messages = Vec::new();
    while let Some(message) = subscription.recv().await {
        println!("{} received: {}", name, message);
        messages.push(message);
    }
    debug!(subscriber = %name, topic = %subscription.topic(), received = messages.len(), "end of stream");
    Transcript {
        subscriber: name,
        topic: subscription.topic().to_string(),
        messages,
    }
}
