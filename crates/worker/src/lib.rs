//! Enrichment job for the price enricher.
//!
//! One run:
//! - Check the persistence backend
//! - Build the baseline from the object named by the trigger
//! - Enrich the latest hourly aggregate against it
//! - Replace the stored price averages

pub mod clock;
pub mod job;

pub use clock::*;
pub use job::*;
