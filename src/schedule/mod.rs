//! Sparse payment-indexed schedules densified by linear interpolation

pub mod loader;
pub mod series;

pub use series::{AnchorPoint, OverpaymentSchedule, RateForecast, SeriesValue, SparseSeries};
