//! Dashboard computed entirely on the client from raw order records.

use contracts::dashboards::local::LocalSummary;
use contracts::shared::charts::Granularity;
use contracts::shared::filters::FilterCriteria;
use contracts::shared::orders::{CanonicalRow, CategoricalField, NumericField, RawRecord};

use crate::analytics::aggregate::{
    group_by_mean, group_count, scatter_pairs, time_bucketed_count_and_sum, values_of,
};
use crate::analytics::filter::apply;
use crate::analytics::gauge::{gauge_reading, on_time_rate};
use crate::analytics::normalizer::normalize_all;
use crate::analytics::stats::{histogram, percentile_set};

pub const DELIVERY_PERCENTILES: [f64; 3] = [50.0, 75.0, 90.0];
pub const HISTOGRAM_BINS: usize = 10;

/// Normalize, filter and summarize raw records
pub fn summarize_records(records: &[RawRecord], criteria: &FilterCriteria) -> LocalSummary {
    summarize(&normalize_all(records), criteria)
}

pub fn summarize(rows: &[CanonicalRow], criteria: &FilterCriteria) -> LocalSummary {
    let filtered = apply(rows, criteria);
    let delivery = values_of(&filtered, NumericField::ActualDeliveryMinutes);

    tracing::debug!("Summarizing {} of {} rows", filtered.len(), rows.len());

    LocalSummary {
        total_rows: rows.len(),
        filtered_rows: filtered.len(),
        revenue_by_day: time_bucketed_count_and_sum(&filtered, NumericField::TotalBrl, Granularity::Day),
        avg_ticket_by_platform: group_by_mean(
            &filtered,
            CategoricalField::Platform,
            NumericField::TotalBrl,
            None,
        ),
        satisfaction_by_region: group_by_mean(
            &filtered,
            CategoricalField::MacroRegion,
            NumericField::SatisfactionLevel,
            None,
        ),
        orders_by_status: group_count(&filtered, CategoricalField::Status),
        delivery_percentiles: percentile_set(&delivery, &DELIVERY_PERCENTILES),
        delivery_histogram: histogram(&delivery, HISTOGRAM_BINS),
        distance_vs_delivery: scatter_pairs(
            &filtered,
            NumericField::DistanceKm,
            NumericField::ActualDeliveryMinutes,
        ),
        on_time_gauge: on_time_rate(&filtered).map(gauge_reading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::excel_importer::read_csv_str;
    use contracts::shared::charts::{GaugeBand, GroupCount, PercentileValue};

    const ORDERS_CSV: &str = "\
order_datetime;platform;macro_bairro;status;total_brl;actual_delivery_minutes;eta_minutes_quote;distance_km;satisfacao_nivel
2024-03-01 12:10:00;iFood;Centro;entregue;50,00;20;25;2,5;5
2024-03-01 19:45:00;iFood;Norte;entregue;30,00;40;30;6;3
2024-03-02 13:00:00;Rappi;Centro;cancelado;;;;;
invalid;Rappi;;entregue;20;30;30;4;4
";

    #[test]
    fn test_summary_from_csv() {
        let sheet = read_csv_str(ORDERS_CSV, "orders.csv").unwrap();
        let summary = summarize_records(&sheet.records, &FilterCriteria::default());

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.filtered_rows, 4);

        // the undated row is left out of the time series
        let days: Vec<(&str, usize, f64)> = summary
            .revenue_by_day
            .iter()
            .map(|b| (b.key.as_str(), b.count, b.sum))
            .collect();
        assert_eq!(days, vec![("2024-03-01", 2, 80.0), ("2024-03-02", 1, 0.0)]);

        assert_eq!(summary.avg_ticket_by_platform[0].key, "iFood");
        assert_eq!(summary.avg_ticket_by_platform[0].mean, 40.0);
        assert_eq!(summary.avg_ticket_by_platform[1].mean, 20.0);

        let regions: Vec<&str> = summary
            .satisfaction_by_region
            .iter()
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(regions, vec!["Centro", "unknown", "Norte"]);

        assert_eq!(
            summary.orders_by_status[0],
            GroupCount {
                key: "entregue".into(),
                count: 3
            }
        );
        assert_eq!(
            summary.delivery_percentiles[0],
            PercentileValue { p: 50.0, value: 30.0 }
        );
        assert_eq!(summary.delivery_histogram.len(), HISTOGRAM_BINS);
        assert_eq!(summary.distance_vs_delivery.len(), 3);

        // 2 of 3 rows within the quoted ETA
        let gauge = summary.on_time_gauge.unwrap();
        assert!((gauge.value - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(gauge.band, GaugeBand::Warning);
    }

    #[test]
    fn test_summary_respects_criteria() {
        let sheet = read_csv_str(ORDERS_CSV, "orders.csv").unwrap();
        let criteria = FilterCriteria::default().with_equals(CategoricalField::Platform, "Rappi");
        let summary = summarize_records(&sheet.records, &criteria);

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.filtered_rows, 2);
        assert_eq!(summary.avg_ticket_by_platform.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[], &FilterCriteria::default());
        assert_eq!(summary.total_rows, 0);
        assert!(summary.revenue_by_day.is_empty());
        assert!(summary.delivery_histogram.is_empty());
        assert_eq!(summary.delivery_percentiles.len(), 3);
        assert!(summary.delivery_percentiles.iter().all(|p| p.value == 0.0));
        assert_eq!(summary.on_time_gauge, None);
    }
}
