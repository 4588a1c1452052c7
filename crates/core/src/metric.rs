//! Tracked metrics and the numeric rules for comparing them to a baseline.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the seven values tracked per item-market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Quantity,
    P05,
    P10,
    P25,
    P50,
    P75,
    P90,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Quantity,
        Metric::P05,
        Metric::P10,
        Metric::P25,
        Metric::P50,
        Metric::P75,
        Metric::P90,
    ];

    /// Column prefix used in logs and the persisted table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::P05 => "p05",
            Self::P10 => "p10",
            Self::P25 => "p25",
            Self::P50 => "p50",
            Self::P75 => "p75",
            Self::P90 => "p90",
        }
    }

    /// Column holding this metric's sum in the historical snapshot.
    pub fn baseline_column(&self) -> usize {
        4 + self.ordinal()
    }

    /// Column holding this metric's current value in the detail snapshot.
    ///
    /// Columns 5 and 6 sit between quantity and the percentile bands and are
    /// not read.
    pub fn detail_column(&self) -> usize {
        match self {
            Self::Quantity => 4,
            other => 6 + other.ordinal(),
        }
    }

    fn ordinal(&self) -> usize {
        match self {
            Self::Quantity => 0,
            Self::P05 => 1,
            Self::P10 => 2,
            Self::P25 => 3,
            Self::P50 => 4,
            Self::P75 => 5,
            Self::P90 => 6,
        }
    }
}

/// A value per [`Metric`], indexable by metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSet<T>([T; 7]);

impl<T> MetricSet<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self(Metric::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Metric> for MetricSet<T> {
    type Output = T;

    fn index(&self, metric: Metric) -> &T {
        &self.0[metric.ordinal()]
    }
}

impl<T> IndexMut<Metric> for MetricSet<T> {
    fn index_mut(&mut self, metric: Metric) -> &mut T {
        &mut self.0[metric.ordinal()]
    }
}

/// Current value expressed relative to its baseline average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Percent {
    Finite(f64),
    /// The baseline average is zero, so no ratio exists.
    Undefined,
}

impl Percent {
    /// `current / average * 100`, or [`Percent::Undefined`] for a zero average.
    pub fn of(current: i32, average: i32) -> Self {
        if average == 0 {
            return Self::Undefined;
        }
        Self::Finite(f64::from(current) / f64::from(average) * 100.0)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Mean of `sum` over `row_count` rows, rounded half away from zero.
///
/// The quotient is narrowed to `i32` with saturation. A zero row count has no
/// mean and yields 0, which in turn makes the percent undefined.
pub fn average(sum: i64, row_count: i64) -> i32 {
    if row_count == 0 {
        return 0;
    }
    (sum as f64 / row_count as f64).round() as i32
}

/// One metric of an enriched record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub current: i32,
    pub average: i32,
    pub percent: Percent,
}

impl MetricComparison {
    pub fn new(current: i32, sum: i64, row_count: i64) -> Self {
        let average = average(sum, row_count);
        Self {
            current,
            average,
            percent: Percent::of(current, average),
        }
    }
}
