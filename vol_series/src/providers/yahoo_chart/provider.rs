use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use reqwest::{Client, StatusCode, header};
use shared_utils::env::env_var_or;
use tracing::{debug, warn};

use crate::{
    models::observation::DailyClose,
    providers::{
        MarketDataProvider,
        errors::ProviderError,
        yahoo_chart::response::{ChartResponse, ChartResult},
    },
};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Environment variable overriding the chart endpoint (alternate mirrors, test servers).
const BASE_URL_ENV: &str = "VOL_SERIES_CHART_BASE_URL";

/// The endpoint rejects requests without a user agent.
const USER_AGENT: &str = "vol_series/0.1";

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Creates a new provider against the public chart endpoint.
    ///
    /// The base URL can be overridden through the `VOL_SERIES_CHART_BASE_URL`
    /// environment variable.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(env_var_or(BASE_URL_ENV, DEFAULT_BASE_URL))
    }

    /// Creates a provider against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, ProviderError> {
        // period2 is exclusive, so push it past the end date to keep the
        // requested range inclusive.
        let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let period2 = (end + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let url = format!("{}/{}", self.base_url, symbol);
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
        ];

        debug!(symbol, %start, %end, "fetching daily closes");
        let response = self.client.get(&url).query(&query).send().await?;

        // Unknown symbols come back as 404; the provider contract maps those
        // to an empty series rather than an error.
        if response.status() == StatusCode::NOT_FOUND {
            debug!(symbol, "symbol not found, returning empty series");
            return Ok(vec![]);
        }

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let payload = response.json::<ChartResponse>().await?;

        let result = match payload.chart.result.and_then(|r| r.into_iter().next()) {
            Some(result) => result,
            None => {
                return match payload.chart.error {
                    Some(err) => Err(ProviderError::Api(format!("{}: {}", err.code, err.description))),
                    None => Ok(vec![]),
                };
            }
        };

        closes_from_result(symbol, result)
    }
}

fn closes_from_result(symbol: &str, result: ChartResult) -> Result<Vec<DailyClose>, ProviderError> {
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        warn!(
            symbol,
            timestamps = result.timestamp.len(),
            closes = closes.len(),
            "close column shorter than timestamp column, truncating"
        );
    }

    let mut out = Vec::new();
    for (ts, close) in result.timestamp.iter().zip(closes) {
        // Null closes mark non-trading slots; skip them.
        let Some(close) = close else { continue };
        let date = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| ProviderError::Decode(format!("timestamp out of range: {ts}")))?
            .date_naive();
        out.push(DailyClose { date, close });
    }

    Ok(out)
}
