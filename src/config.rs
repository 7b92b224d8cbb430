use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::core::error::PubSubError;

/// Registry-wide knobs shared by every topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Upper bound on a single handoff. `None` = wait for the reader forever.
    pub handoff_timeout: Option<Duration>,
}

impl RegistryConfig {
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, PubSubError> {
        match path {
            Some(p) => Self::read_from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PubSubError> {
        let raw = fs::read_to_string(&path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, PubSubError> {
        Ok(toml::from_str(raw)?)
    }
}
