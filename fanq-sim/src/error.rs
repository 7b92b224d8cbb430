use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Delay window is inverted: min {min_ms}ms > max {max_ms}ms")]
    DelayWindow { min_ms: u64, max_ms: u64 },

    #[error("Subscriber {subscriber:?} lists topic {topic:?} more than once")]
    DuplicateTopic { subscriber: String, topic: String },

    #[error("Subscriber {subscriber:?} listens on {topic:?} but no publisher ever closes it")]
    OrphanTopic { subscriber: String, topic: String },
}
