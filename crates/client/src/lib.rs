//! Client-side analytics core of the delivery dashboard.
//!
//! Raw order rows flow through [`analytics::normalizer`], [`analytics::filter`]
//! and the aggregation functions into chart-ready shapes. When aggregates are
//! computed by the backend, [`dashboards`] pages fetch them through the
//! [`coordinator`] and reshape the payloads defensively.

pub mod analytics;
pub mod coordinator;
pub mod dashboards;
pub mod shared;
