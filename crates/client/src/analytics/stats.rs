/// Distribution statistics used by box plots, percentile tables and histograms.
use contracts::shared::charts::{HistogramBin, PercentileValue, QuantileSummary};

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Linear interpolation on an already sorted, non-empty slice. `p` in [0, 100].
fn interpolate(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Arithmetic mean of the finite values. Returns 0.0 if there are none.
pub fn mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

/// Percentile with linear interpolation. `p` is in [0, 100].
/// Returns 0.0 if the slice is empty.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return 0.0;
    }
    interpolate(&sorted, p)
}

/// Several percentiles over one sort. Zero-filled for empty input.
pub fn percentile_set(values: &[f64], percentiles: &[f64]) -> Vec<PercentileValue> {
    let sorted = sorted_finite(values);
    percentiles
        .iter()
        .map(|&p| PercentileValue {
            p,
            value: if sorted.is_empty() {
                0.0
            } else {
                interpolate(&sorted, p)
            },
        })
        .collect()
}

/// Min, quartiles, median and max. All zero for empty input.
pub fn five_number_summary(values: &[f64]) -> QuantileSummary {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return QuantileSummary::default();
    };
    QuantileSummary {
        min,
        q1: interpolate(&sorted, 25.0),
        median: interpolate(&sorted, 50.0),
        q3: interpolate(&sorted, 75.0),
        max,
    }
}

/// Equal-width histogram over `[min, max]`.
///
/// Bins are half-open except the last, which also holds the maximum. When all
/// values are equal every value lands in the last bin.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if bin_count == 0 {
        return Vec::new();
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bin_count {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    let last = bin_count - 1;
    for v in sorted {
        let idx = if width > 0.0 {
            (((v - min) / width).floor() as usize).min(last)
        } else {
            last
        };
        bins[idx].count += 1;
    }

    bins
}
