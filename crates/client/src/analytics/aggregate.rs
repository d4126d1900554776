//! Single-pass grouping over canonical rows.

use std::collections::{BTreeMap, HashMap};

use contracts::shared::charts::{
    GroupCount, GroupMean, GroupTotal, Granularity, ScatterPoint, TimeBucket,
};
use contracts::shared::orders::{CanonicalRow, CategoricalField, NumericField};

use super::temporal::bucket_key;

/// Group label for rows whose key field is null
pub const UNKNOWN_KEY: &str = "unknown";

/// Running accumulators of one group.
///
/// Created when the first row of the group is seen, updated once per row and
/// read only after the full pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBucket {
    pub key: String,
    /// Rows that contributed a non-null value
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl AggregateBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    pub fn observe(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.count += 1;
            self.sum += v;
            self.sum_sq += v * v;
        }
    }

    /// 0.0 when nothing contributed
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Population variance, 0.0 when nothing contributed
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }
}

/// Buckets keyed by category, kept in first-seen order
fn bucket_by_key(
    rows: &[CanonicalRow],
    key: CategoricalField,
    value: Option<NumericField>,
) -> Vec<(AggregateBucket, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(AggregateBucket, usize)> = Vec::new();

    for row in rows {
        let group = row.category(key).unwrap_or(UNKNOWN_KEY);
        let slot = match index.get(group) {
            Some(&slot) => slot,
            None => {
                index.insert(group.to_string(), buckets.len());
                buckets.push((AggregateBucket::new(group), 0));
                buckets.len() - 1
            }
        };
        let (bucket, rows_seen) = &mut buckets[slot];
        *rows_seen += 1;
        if let Some(field) = value {
            bucket.observe(row.numeric(field));
        }
    }

    buckets
}

/// Mean of `value` per `key`, highest mean first.
///
/// Null keys group under [`UNKNOWN_KEY`]. A group whose values are all null is
/// still reported, with mean 0. Ties keep first-seen order.
pub fn group_by_mean(
    rows: &[CanonicalRow],
    key: CategoricalField,
    value: NumericField,
    top_n: Option<usize>,
) -> Vec<GroupMean> {
    let mut groups: Vec<GroupMean> = bucket_by_key(rows, key, Some(value))
        .into_iter()
        .map(|(bucket, _)| GroupMean {
            mean: bucket.mean(),
            count: bucket.count,
            key: bucket.key,
        })
        .collect();

    groups.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(std::cmp::Ordering::Equal));
    if let Some(n) = top_n {
        groups.truncate(n);
    }
    groups
}

/// Number of rows per `key`, largest first
pub fn group_count(rows: &[CanonicalRow], key: CategoricalField) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = bucket_by_key(rows, key, None)
        .into_iter()
        .map(|(bucket, rows_seen)| GroupCount {
            key: bucket.key,
            count: rows_seen,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Sum of `value` per `key` with each group's share of the grand total
pub fn group_sum(rows: &[CanonicalRow], key: CategoricalField, value: NumericField) -> Vec<GroupTotal> {
    let buckets = bucket_by_key(rows, key, Some(value));
    let grand_total: f64 = buckets.iter().map(|(b, _)| b.sum).sum();

    let mut groups: Vec<GroupTotal> = buckets
        .into_iter()
        .map(|(bucket, _)| GroupTotal {
            share_pct: (grand_total != 0.0).then(|| bucket.sum / grand_total * 100.0),
            total: bucket.sum,
            key: bucket.key,
        })
        .collect();
    groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    groups
}

/// Row count and `amount` sum per time bucket, oldest bucket first.
///
/// Undated rows are skipped. The count includes every dated row; the sum only
/// non-null amounts.
pub fn time_bucketed_count_and_sum(
    rows: &[CanonicalRow],
    amount: NumericField,
    granularity: Granularity,
) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<String, (usize, f64)> = BTreeMap::new();

    for row in rows {
        let Some(at) = row.order_datetime else {
            continue;
        };
        let entry = buckets.entry(bucket_key(&at, granularity)).or_insert((0, 0.0));
        entry.0 += 1;
        if let Some(v) = row.numeric(amount).filter(|v| v.is_finite()) {
            entry.1 += v;
        }
    }

    buckets
        .into_iter()
        .map(|(key, (count, sum))| TimeBucket { key, count, sum })
        .collect()
}

/// One point per row where both fields are present, in input order
pub fn scatter_pairs(rows: &[CanonicalRow], x: NumericField, y: NumericField) -> Vec<ScatterPoint> {
    rows.iter()
        .filter_map(|row| match (row.numeric(x), row.numeric(y)) {
            (Some(x), Some(y)) => Some(ScatterPoint { x, y }),
            _ => None,
        })
        .collect()
}

/// Non-null values of one field, in input order
pub fn values_of(rows: &[CanonicalRow], field: NumericField) -> Vec<f64> {
    rows.iter().filter_map(|row| row.numeric(field)).collect()
}

/// The `n` items with the highest score; ties keep input order
pub fn top_n<T>(mut items: Vec<T>, n: usize, score: impl Fn(&T) -> f64) -> Vec<T> {
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(std::cmp::Ordering::Equal));
    items.truncate(n);
    items
}
