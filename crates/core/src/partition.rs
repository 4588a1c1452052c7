//! Hourly partition paths of the aggregates output.

use chrono::{DateTime, Utc};

/// Interval segment written by the hourly aggregation job.
pub const AGGREGATE_INTERVAL: u32 = 1;

/// Builds `{prefix}/interval=1/year=YYYY/month=MM/day=DD/hour=HH` for `now`.
///
/// Trailing slashes on `prefix` are dropped; an empty prefix yields a path
/// starting at `interval=`.
pub fn hourly_partition(prefix: &str, now: DateTime<Utc>) -> String {
    let partition = format!(
        "interval={}/{}",
        AGGREGATE_INTERVAL,
        now.format("year=%Y/month=%m/day=%d/hour=%H")
    );

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        partition
    } else {
        format!("{}/{}", prefix, partition)
    }
}
