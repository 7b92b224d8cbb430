use std::sync::Arc;
use fanq::Registry;

pub type SharedRegistry = Arc<Registry>;
