/// Ids handed to subscriptions start here; 0 is never issued.
pub const FIRST_SUBSCRIPTION_ID: u64 = 1;

/// Initial capacity of a freshly created topic sequence.
pub const DEFAULT_TOPIC_CAPACITY: usize = 4;
