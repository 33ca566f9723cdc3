//! Volatility-index analytics on top of a [`MarketDataProvider`].
//!
//! Covers the three recognized VIX index variants, the eight-contract futures
//! curve for a single date, and the per-date shape classification of a whole
//! series. All multi-fetch operations are strictly sequential: one request is
//! awaited before the next is issued, with no batching or caching.

use std::str::FromStr;

use chrono::{NaiveDate, TimeZone, Utc};
use tracing::debug;

use crate::{
    errors::Error,
    models::{
        observation::Observation,
        series::TimeSeries,
        term_structure::{ShapeSeries, TermStructure, TermStructurePoint},
    },
    providers::MarketDataProvider,
};

/// The recognized volatility index variants and their tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VixIndex {
    /// 30-day expected volatility, `^VIX`.
    Regular,
    /// 9-day expected volatility, `^VIX9D`.
    Vix9d,
    /// 1-day expected volatility, `^VIX1D`.
    Vix1d,
}

impl VixIndex {
    /// The ticker symbol queried for this variant.
    pub const fn ticker(&self) -> &'static str {
        match self {
            Self::Regular => "^VIX",
            Self::Vix9d => "^VIX9D",
            Self::Vix1d => "^VIX1D",
        }
    }
}

impl FromStr for VixIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "vix9d" => Ok(Self::Vix9d),
            "vix1d" => Ok(Self::Vix1d),
            _ => Err(Error::InvalidArgument(format!(
                "unrecognized vix_type {s:?}, expected \"regular\", \"vix9d\" or \"vix1d\""
            ))),
        }
    }
}

/// Continuous-contract symbols for the first eight monthly VIX futures,
/// front month first.
pub const VIX_FUTURES_SYMBOLS: [&str; 8] = [
    "VX1!", "VX2!", "VX3!", "VX4!", "VX5!", "VX6!", "VX7!", "VX8!",
];

/// Fetch the VIX futures curve observed on `date`.
///
/// Each of the eight contract symbols is queried as a single-day window.
/// Contracts with no data that day are skipped, and the returned points are
/// labeled `"Month 1"… "Month K"` over the K contracts that had data — a
/// genuine gap renumbers the months behind it. Transport or API errors on
/// any contract abort the whole call.
pub async fn vix_futures_term_structure<P>(
    provider: &P,
    date: NaiveDate,
) -> Result<TermStructure, Error>
where
    P: MarketDataProvider + ?Sized,
{
    let mut points = Vec::new();
    for symbol in VIX_FUTURES_SYMBOLS {
        let closes = provider.fetch_daily_closes(symbol, date, date).await?;
        match closes.iter().find(|c| c.date == date) {
            Some(close) => points.push(close.close),
            None => debug!(symbol, %date, "no contract data, skipping month"),
        }
    }

    let points = points
        .into_iter()
        .enumerate()
        .map(|(idx, price)| TermStructurePoint {
            label: format!("Month {}", idx + 1),
            price,
        })
        .collect();

    Ok(TermStructure { date, points })
}

impl TimeSeries {
    /// Fetch the named volatility index over this series' date range.
    ///
    /// `vix_type` must be one of `"regular"`, `"vix9d"` or `"vix1d"`; anything
    /// else fails with [`Error::InvalidArgument`] before any network call, as
    /// does an empty series (which has no date range). The fetched close
    /// prices come back as a new series keyed by normalized dates
    /// (midnight UTC).
    pub async fn fetch_vix_series<P>(&self, provider: &P, vix_type: &str) -> Result<TimeSeries, Error>
    where
        P: MarketDataProvider + ?Sized,
    {
        let index: VixIndex = vix_type.parse()?;

        let (start, end) = match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(Error::InvalidArgument(
                    "cannot derive a fetch range from an empty series".into(),
                ));
            }
        };

        let closes = provider.fetch_daily_closes(index.ticker(), start, end).await?;

        let observations = closes
            .into_iter()
            .map(|c| {
                let key = Utc.from_utc_datetime(&c.date.and_hms_opt(0, 0, 0).unwrap());
                Observation::new(key, c.close)
            })
            .collect();

        Ok(TimeSeries::new(observations))
    }

    /// Classify the VIX futures curve for every timestamp in this series.
    ///
    /// Runs one fetch cycle (eight contract queries) per timestamp, strictly
    /// in index order. The result has exactly one shape per source timestamp.
    pub async fn generate_vix_term_structure_series<P>(
        &self,
        provider: &P,
    ) -> Result<ShapeSeries, Error>
    where
        P: MarketDataProvider + ?Sized,
    {
        let mut shapes = Vec::with_capacity(self.len());
        for timestamp in self.timestamps() {
            let structure = vix_futures_term_structure(provider, timestamp.date_naive()).await?;
            shapes.push((timestamp, structure.shape()));
        }
        Ok(ShapeSeries::new(shapes))
    }
}
