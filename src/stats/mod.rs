//! Stats module - Aggregation and dashboard views

mod aggregator;
mod record;
mod views;

pub use aggregator::{AggregateError, Aggregator, DEFAULT_YEAR};
pub use record::{DeptRecord, ResultRecord, Status, StatusCount};
pub use views::{Distribution, OverallView, TrendView, YearView};
