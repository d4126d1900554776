pub mod export;
pub mod import;
pub mod page;

use anyhow::Context;
use clap::Args;
use contracts::shared::filters::{FilterCriteria, NumericRange};
use contracts::shared::orders::{CategoricalField, NumericField};
use dashboard_client::shared::date_utils::parse_datetime;
use serde::Serialize;

/// Filter flags shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Earliest order timestamp, inclusive (a bare date means midnight)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest order timestamp, inclusive (a bare date means midnight)
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long)]
    pub macro_region: Option<String>,

    /// Order status, e.g. "Entregue"
    #[arg(long)]
    pub status: Option<String>,

    /// Lowest satisfaction level to keep
    #[arg(long)]
    pub score_min: Option<f64>,

    /// Highest satisfaction level to keep
    #[arg(long)]
    pub score_max: Option<f64>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> anyhow::Result<FilterCriteria> {
        let mut criteria = FilterCriteria::default();

        if let Some(from) = &self.from {
            criteria = criteria.with_date_from(parse_date_arg("--from", from)?);
        }
        if let Some(to) = &self.to {
            criteria = criteria.with_date_to(parse_date_arg("--to", to)?);
        }

        let equals = [
            (CategoricalField::Platform, &self.platform),
            (CategoricalField::MacroRegion, &self.macro_region),
            (CategoricalField::Status, &self.status),
        ];
        for (field, value) in equals {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                criteria = criteria.with_equals(field, value);
            }
        }

        if self.score_min.is_some() || self.score_max.is_some() {
            criteria = criteria.with_range(
                NumericField::SatisfactionLevel,
                NumericRange {
                    min: self.score_min,
                    max: self.score_max,
                },
            );
        }

        Ok(criteria)
    }
}

fn parse_date_arg(flag: &str, value: &str) -> anyhow::Result<chrono::NaiveDateTime> {
    parse_datetime(value).with_context(|| format!("Invalid date for {}: '{}'", flag, value))
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_flags_are_unconstrained() {
        let criteria = FilterArgs::default().to_criteria().unwrap();
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_flags_become_criteria() {
        let args = FilterArgs {
            from: Some("2024-01-01".into()),
            to: Some("31/01/2024 23:59".into()),
            platform: Some(" iFood ".into()),
            macro_region: Some("".into()),
            score_min: Some(4.0),
            ..FilterArgs::default()
        };
        let criteria = args.to_criteria().unwrap();

        assert_eq!(
            criteria.date_from,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            criteria.date_to,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(23, 59, 0)
        );
        assert_eq!(criteria.equality(CategoricalField::Platform), Some("iFood"));
        assert_eq!(criteria.equality(CategoricalField::MacroRegion), None);
        assert_eq!(
            criteria.ranges.get(&NumericField::SatisfactionLevel),
            Some(&NumericRange {
                min: Some(4.0),
                max: None
            })
        );
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let args = FilterArgs {
            to: Some("2024-13-01".into()),
            ..FilterArgs::default()
        };
        let err = args.to_criteria().unwrap_err();
        assert!(err.to_string().contains("--to"));
    }
}
