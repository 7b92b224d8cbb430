use std::future::Future;
use std::time::Duration;
use fanq::{Registry, RegistryConfig, Subscription};

#[allow(dead_code)]
pub const LIVENESS: Duration = Duration::from_secs(2);

#[allow(dead_code)]
pub fn registry() -> Registry {
    Registry::with_config(RegistryConfig::default())
}

#[allow(dead_code)]
pub fn registry_with_timeout(limit: Duration) -> Registry {
    Registry::with_config(RegistryConfig {
        handoff_timeout: Some(limit),
    })
}

/// Reads until end-of-stream.
#[allow(dead_code)]
pub async fn drain(mut sub: Subscription) -> Vec<String> {
    let mut got = Vec::new();
    while let Some(msg) = sub.recv().await {
        got.push(msg);
    }
    got
}

/// Fails the test instead of hanging forever.
#[allow(dead_code)]
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(LIVENESS, fut)
        .await
        .expect("operation did not complete in time")
}
