//! Provider abstraction for market data sources.
//!
//! This module defines the [`MarketDataProvider`] trait, the unified interface
//! for fetching daily close-price series from any market data vendor. Each
//! concrete implementation (such as [`yahoo_chart::provider::YahooChartProvider`])
//! handles vendor-specific request and payload logic.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn MarketDataProvider`) for runtime selection of providers.
//!
//! Contract: an *unknown* symbol resolves to `Ok(vec![])`, not an error, so
//! multi-contract queries can skip absent contracts gracefully. Transport and
//! API failures are real errors.

pub mod errors;
pub mod yahoo_chart;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{models::observation::DailyClose, providers::errors::ProviderError};

#[async_trait]
pub trait MarketDataProvider {
    /// Fetch daily closing prices for `symbol` over `start..=end` (calendar
    /// dates, inclusive), ordered by date ascending.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, ProviderError>;
}
