use std::collections::BTreeMap;
use fanq_sim::SimConfig;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Small, fast setup: no pacing, fixed seed.
pub fn quick_config() -> SimConfig {
    SimConfig {
        min_delay_ms: 0,
        max_delay_ms: 2,
        seed: Some(42),
        publishers: BTreeMap::from([
            ("Dogs".to_string(), owned(&["d1", "d2", "d3"])),
            ("Cats".to_string(), owned(&["c1", "c2"])),
        ]),
        subscribers: BTreeMap::from([
            ("Mary".to_string(), owned(&["Dogs"])),
            ("Tom".to_string(), owned(&["Dogs", "Cats"])),
        ]),
        ..SimConfig::default()
    }
}
