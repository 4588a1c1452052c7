//! Historical baseline built from the pre-aggregated snapshot.
//!
//! Columns: realm, auction-house, item, row count, then one sum per
//! [`Metric`] in [`Metric::ALL`] order.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::key::CompositeKey;
use crate::metric::{Metric, MetricSet};
use crate::tabular::{NumericParsing, TabularReader};

/// Row count and metric sums for one key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub row_count: i64,
    pub sums: MetricSet<i64>,
}

/// Read-only lookup from key to baseline, complete once built.
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    entries: HashMap<CompositeKey, BaselineEntry>,
}

impl BaselineTable {
    pub fn get(&self, key: &CompositeKey) -> Option<&BaselineEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, &BaselineEntry)> {
        self.entries.iter()
    }
}

impl FromIterator<(CompositeKey, BaselineEntry)> for BaselineTable {
    fn from_iter<I: IntoIterator<Item = (CompositeKey, BaselineEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Builds a [`BaselineTable`] from a historical snapshot stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineAggregator {
    parsing: NumericParsing,
}

impl BaselineAggregator {
    pub fn new(parsing: NumericParsing) -> Self {
        Self { parsing }
    }

    /// Consumes the stream to exhaustion.
    ///
    /// Each row becomes the entry for its key; a later row with the same key
    /// replaces the earlier one.
    pub fn build<R: Read>(&self, reader: R) -> Result<BaselineTable> {
        let mut reader = TabularReader::open(reader, self.parsing)?;
        let mut entries = HashMap::new();

        while let Some(row) = reader.next_row()? {
            let key = CompositeKey::new(
                row.int(0, "realm_id")?,
                row.int(1, "auction_house_id")?,
                row.int(2, "item_id")?,
            );
            let row_count: i64 = row.int(3, "row_count")?;
            if row_count < 1 && self.parsing.is_strict() {
                return Err(Error::malformed(
                    row.line(),
                    format!("row count for key {} must be at least 1, got {}", key, row_count),
                ));
            }

            let mut sums = MetricSet::default();
            for metric in Metric::ALL {
                sums[metric] = row.int(metric.baseline_column(), metric.name())?;
            }

            entries.insert(key, BaselineEntry { row_count, sums });
        }

        Ok(BaselineTable { entries })
    }
}
