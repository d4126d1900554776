//! Pure transformations from rows or payloads to chart shapes.
//!
//! Nothing here performs I/O or fails: malformed input degrades to `None`,
//! empty collections or zero-filled results.

pub mod aggregate;
pub mod filter;
pub mod gauge;
pub mod normalizer;
pub mod reshape;
pub mod stats;
pub mod temporal;

pub use aggregate::{
    group_by_mean, group_count, group_sum, scatter_pairs, time_bucketed_count_and_sum, top_n,
    values_of, AggregateBucket,
};
pub use filter::apply;
pub use gauge::{gauge_band, gauge_normalize, gauge_reading, on_time_rate, percent_scale};
pub use normalizer::{normalize, normalize_all};
pub use stats::{five_number_summary, histogram, mean, percentile, percentile_set};
pub use temporal::{bucket_key, granularity_for_days, granularity_for_range};
