use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::orders::{CategoricalField, NumericField};

/// Inclusive numeric bounds; an unset side does not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn exactly(value: f64) -> Self {
        Self {
            min: Some(value),
            max: Some(value),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Set of optional predicates combined with AND.
///
/// Every predicate defaults to "no constraint". Values are immutable: the
/// `with_*` builders return a new criteria set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive lower bound on the order timestamp
    pub date_from: Option<NaiveDateTime>,
    /// Inclusive upper bound on the order timestamp
    pub date_to: Option<NaiveDateTime>,
    #[serde(default)]
    pub equals: BTreeMap<CategoricalField, String>,
    #[serde(default)]
    pub ranges: BTreeMap<NumericField, NumericRange>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.equals.is_empty()
            && self.ranges.is_empty()
    }

    pub fn with_date_from(&self, from: NaiveDateTime) -> Self {
        let mut next = self.clone();
        next.date_from = Some(from);
        next
    }

    pub fn with_date_to(&self, to: NaiveDateTime) -> Self {
        let mut next = self.clone();
        next.date_to = Some(to);
        next
    }

    pub fn with_equals(&self, field: CategoricalField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.equals.insert(field, value.into());
        next
    }

    pub fn with_range(&self, field: NumericField, range: NumericRange) -> Self {
        let mut next = self.clone();
        next.ranges.insert(field, range);
        next
    }

    pub fn equality(&self, field: CategoricalField) -> Option<&str> {
        self.equals.get(&field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_do_not_mutate_source() {
        let base = FilterCriteria::default();
        let narrowed = base.with_equals(CategoricalField::Platform, "iFood");
        assert!(base.is_unconstrained());
        assert!(!narrowed.is_unconstrained());
        assert_eq!(narrowed.equality(CategoricalField::Platform), Some("iFood"));
    }

    #[test]
    fn test_numeric_range_bounds_are_inclusive() {
        let range = NumericRange {
            min: Some(3.0),
            max: Some(5.0),
        };
        assert!(range.contains(3.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.5));
        assert!(NumericRange::default().contains(-100.0));
    }
}
