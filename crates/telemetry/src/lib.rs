//! Structured logging and per-run metrics for the price enricher.
//!
//! Metrics live on the job that records them and are logged when the run
//! finishes; nothing is kept in process-wide state.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
