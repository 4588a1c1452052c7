//! Core types, baseline aggregation, and enrichment for the price enricher.

pub mod baseline;
pub mod enrich;
pub mod error;
pub mod event;
pub mod key;
pub mod metric;
pub mod partition;
pub mod tabular;

pub use baseline::{BaselineAggregator, BaselineEntry, BaselineTable};
pub use enrich::{EnrichedRecord, Enricher};
pub use error::{Error, Result};
pub use event::{ObjectRef, S3Event};
pub use key::CompositeKey;
pub use metric::{Metric, MetricComparison, MetricSet, Percent};
pub use tabular::NumericParsing;
