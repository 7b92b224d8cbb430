use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PubSubError {
    #[error("Topic {0:?} has been closed")]
    TopicClosed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}
