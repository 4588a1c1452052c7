//! Joins the detail snapshot against the baseline.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::baseline::BaselineTable;
use crate::error::{Error, Result};
use crate::key::CompositeKey;
use crate::metric::{Metric, MetricComparison, MetricSet};
use crate::tabular::{NumericParsing, TabularReader};

/// Current values of one detail row next to their baseline averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub key: CompositeKey,
    pub metrics: MetricSet<MetricComparison>,
}

impl EnrichedRecord {
    /// Number of metrics whose percent has no defined value.
    pub fn undefined_percents(&self) -> usize {
        self.metrics
            .iter()
            .filter(|(_, cmp)| cmp.percent.is_undefined())
            .count()
    }
}

/// Enriches detail rows using a fully built [`BaselineTable`].
pub struct Enricher<'a> {
    baseline: &'a BaselineTable,
    parsing: NumericParsing,
}

impl<'a> Enricher<'a> {
    pub fn new(baseline: &'a BaselineTable, parsing: NumericParsing) -> Self {
        Self { baseline, parsing }
    }

    /// Enriches every row of the stream, in order.
    ///
    /// Stops at the first row whose key has no baseline; nothing is returned
    /// for the rows before it.
    pub fn enrich<R: Read>(&self, reader: R) -> Result<Vec<EnrichedRecord>> {
        let mut reader = TabularReader::open(reader, self.parsing)?;
        let mut records = Vec::new();

        while let Some(row) = reader.next_row()? {
            let key = CompositeKey::new(
                row.int(1, "realm_id")?,
                row.int(2, "auction_house_id")?,
                row.int(3, "item_id")?,
            );

            let mut current = MetricSet::<i32>::default();
            for metric in Metric::ALL {
                current[metric] = row.int(metric.detail_column(), metric.name())?;
            }

            let entry = self
                .baseline
                .get(&key)
                .ok_or(Error::MissingBaseline { key })?;

            let metrics = MetricSet::from_fn(|metric| {
                MetricComparison::new(current[metric], entry.sums[metric], entry.row_count)
            });

            records.push(EnrichedRecord { key, metrics });
        }

        Ok(records)
    }
}
