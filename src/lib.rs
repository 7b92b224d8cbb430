pub mod core;
pub mod config;

use std::sync::OnceLock;

pub use config::RegistryConfig;
pub use crate::core::endpoint::Subscription;
pub use crate::core::error::PubSubError;
pub use crate::core::registry::{PublishReport, Registry};

/// Set **once** by the host process before any `Registry::new()`; read-only afterwards.
pub static REGISTRY_CONFIG: OnceLock<RegistryConfig> = OnceLock::new();

/// Convenience accessor used by `Registry::new()`.
pub fn registry_config() -> &'static RegistryConfig {
    REGISTRY_CONFIG.get_or_init(RegistryConfig::default)
}
