//! ClickHouse client for the price enricher.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;
pub mod query;
pub mod schema;
pub mod sink;

pub use client::*;
pub use config::*;
pub use query::*;
pub use sink::PriceAverageSink;
