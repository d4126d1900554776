//! Row filtering by [`FilterCriteria`].

use contracts::shared::filters::FilterCriteria;
use contracts::shared::orders::CanonicalRow;

/// Rows satisfying every set criterion, in input order.
///
/// A row with a null value never matches a criterion set on that field.
/// Date bounds are inclusive.
pub fn apply(rows: &[CanonicalRow], criteria: &FilterCriteria) -> Vec<CanonicalRow> {
    if criteria.is_unconstrained() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| matches(row, criteria))
        .cloned()
        .collect()
}

pub fn matches(row: &CanonicalRow, criteria: &FilterCriteria) -> bool {
    if let Some(from) = criteria.date_from {
        match row.order_datetime {
            Some(at) if at >= from => {}
            _ => return false,
        }
    }

    if let Some(to) = criteria.date_to {
        match row.order_datetime {
            Some(at) if at <= to => {}
            _ => return false,
        }
    }

    let categories_match = criteria
        .equals
        .iter()
        .all(|(field, wanted)| row.category(*field) == Some(wanted.as_str()));
    if !categories_match {
        return false;
    }

    criteria
        .ranges
        .iter()
        .all(|(field, range)| row.numeric(*field).is_some_and(|v| range.contains(v)))
}
