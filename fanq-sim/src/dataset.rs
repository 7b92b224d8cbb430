//! Built-in animal facts used when no config file is given.

use std::collections::BTreeMap;

const DOGS: &[&str] = &[
    "The Beatles song 'A Day in the Life' has a frequency only dogs can hear.",
    "Three dogs survived the Titanic sinking.",
    "A Bloodhound's sense of smell can be used as evidence in court.",
    "The tallest dog in the world is 44 inches tall.",
    "A Greyhound could beat a Cheetah in a long distance race.",
    "30% of Dalmatians are deaf in one ear.",
    "Dogs have three eyelids.",
    "Basenji dogs don't bark, they yodel.",
];

const CATS: &[&str] = &[
    "The first year of a cat's life is equal to the first 15 years of a human life.",
    "Cats can rotate their ears 180 degrees.",
    "The hearing of the average cat is at least five times better than that of a human adult.",
    "Domestic cats speed about 70 percent of the day sleeping.",
    "A cat cannot see directly under its nose.",
    "It's not uncommon for cats to have extra toes.",
    "Meows are not innate cat language; they developed them to communicate with humans!",
];

const BIRDS: &[&str] = &[
    "Ravens are great at mimicking human speech and sounds.",
    "Cardinals like to cover themselves in ants.",
    "Some Ducks sleep with one eye open.",
    "Most Hummingbirds weigh less than a Nickel",
    "In Ancient Greece, Pigeons delivered the results of the Olympic Games.",
    "Budgies catch each other's yawns.",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// topic -> messages, in publish order
pub fn default_publishers() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("Dogs".to_string(), owned(DOGS)),
        ("Cats".to_string(), owned(CATS)),
        ("Birds".to_string(), owned(BIRDS)),
    ])
}

/// subscriber name -> topics
pub fn default_subscribers() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("Mary".to_string(), owned(&["Dogs"])),
        ("Tom".to_string(), owned(&["Dogs", "Cats"])),
        ("Jack".to_string(), owned(&["Cats", "Birds"])),
        ("Sammy".to_string(), owned(&["Birds"])),
    ])
}
