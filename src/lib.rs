pub mod aggregate;
pub mod config;
pub mod crosswalk;
pub mod errors;
pub mod estimates;
pub mod joiner;
pub mod metrics;
pub mod observations;
pub mod output;
pub mod pipeline;
pub mod record;
