use contracts::shared::charts::{GaugeBand, GaugeReading};
use contracts::shared::orders::{CanonicalRow, NumericField};

const GOOD_THRESHOLD: f64 = 80.0;
const WARNING_THRESHOLD: f64 = 60.0;

/// Read a rate as a percentage: values up to and including 1 are fractions,
/// larger values are already percentages. No clamping.
pub fn percent_scale(raw: f64) -> f64 {
    if raw <= 1.0 {
        raw * 100.0
    } else {
        raw
    }
}

/// Bring a rate onto the 0-100 display scale.
///
/// Same reading as [`percent_scale`], clamped to `[0, 100]`; NaN reads as 0.
pub fn gauge_normalize(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    percent_scale(raw).clamp(0.0, 100.0)
}

pub fn gauge_band(value: f64) -> GaugeBand {
    if value >= GOOD_THRESHOLD {
        GaugeBand::Good
    } else if value >= WARNING_THRESHOLD {
        GaugeBand::Warning
    } else {
        GaugeBand::Bad
    }
}

pub fn gauge_reading(raw: f64) -> GaugeReading {
    let value = gauge_normalize(raw);
    GaugeReading {
        value,
        band: gauge_band(value),
    }
}

/// Fraction of rows delivered within the quoted ETA.
///
/// Only rows with both times count; `None` when there are none.
pub fn on_time_rate(rows: &[CanonicalRow]) -> Option<f64> {
    let mut total = 0usize;
    let mut on_time = 0usize;
    for row in rows {
        if let (Some(actual), Some(eta)) = (
            row.numeric(NumericField::ActualDeliveryMinutes),
            row.numeric(NumericField::EtaMinutes),
        ) {
            total += 1;
            if actual <= eta {
                on_time += 1;
            }
        }
    }
    (total > 0).then(|| on_time as f64 / total as f64)
}
