//! Canonical in-memory representation of a single time-series sample.
//!
//! [`Observation`] is the standard element of a [`TimeSeries`](crate::models::series::TimeSeries),
//! and [`DailyClose`] is the standard output row of every
//! [`MarketDataProvider`](crate::providers::MarketDataProvider) implementation,
//! regardless of vendor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The timestamp for this sample (UTC).
    pub timestamp: DateTime<Utc>,

    /// The observed value.
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// One day's closing price for a symbol, as returned by a market data provider.
///
/// This struct is vendor-agnostic; providers convert their wire formats into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// The trading date.
    pub date: NaiveDate,

    /// Closing price on that date.
    pub close: f64,
}
