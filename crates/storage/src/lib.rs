//! Object store access for the price enricher.

pub mod config;
pub mod s3;
pub mod store;

pub use config::*;
pub use s3::S3Store;
pub use store::{download_latest, latest_candidate, ObjectStore, ObjectSummary};
