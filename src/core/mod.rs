mod constants;
pub mod endpoint;
pub mod error;
pub mod registry;
