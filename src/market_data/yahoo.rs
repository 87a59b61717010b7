use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use tracing::info;

use crate::error::MarketDataError;
use crate::market_data::MarketData;
use crate::model::Bar;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Unauthenticated chart API tolerates a couple of requests per second.
const YAHOO_REQUESTS_PER_SECOND: u32 = 2;

pub struct YahooMarketData {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl YahooMarketData {
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_BASE_URL)
    }

    /// Custom base URL (for tests).
    pub fn with_base_url(base_url: &str) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(YAHOO_REQUESTS_PER_SECOND).unwrap());
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_owned(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }
}

impl Default for YahooMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketData for YahooMarketData {
    fn provider(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_daily(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Vec<Bar>, Report<MarketDataError>>> {
        let symbol = symbol.to_owned();
        Box::pin(async move {
            self.rate_limiter.until_ready().await;

            let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
            let period1 = start.timestamp().to_string();
            let period2 = end.timestamp().to_string();
            let params = [
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ];

            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .change_context(MarketDataError::Request {
                    provider: "yahoo".into(),
                })?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(Report::new(MarketDataError::NoData {
                    symbol: symbol.clone(),
                }));
            }
            if !status.is_success() {
                return Err(Report::new(MarketDataError::Http {
                    provider: "yahoo".into(),
                    status: status.as_u16(),
                }));
            }

            let chart: ChartResponse =
                response
                    .json()
                    .await
                    .change_context(MarketDataError::ResponseParse {
                        provider: "yahoo".into(),
                    })?;

            let bars = bars_from_chart(&symbol, chart)?;

            info!(symbol = %symbol, fetched = bars.len(), "yahoo daily bars fetched");
            Ok(bars)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Per-field arrays aligned with `timestamp`; Yahoo emits `null` for halted
/// or missing sessions.
#[derive(Debug, Deserialize)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

fn bars_from_chart(
    symbol: &str,
    response: ChartResponse,
) -> Result<Vec<Bar>, Report<MarketDataError>> {
    if response.chart.error.is_some() {
        return Err(Report::new(MarketDataError::NoData {
            symbol: symbol.to_owned(),
        }));
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| {
            Report::new(MarketDataError::NoData {
                symbol: symbol.to_owned(),
            })
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().ok_or_else(|| {
        Report::new(MarketDataError::NoData {
            symbol: symbol.to_owned(),
        })
    })?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
            DateTime::from_timestamp(ts, 0),
        );
        // Skip sessions with any missing field
        if let (Some(open), Some(high), Some(low), Some(close), Some(volume), Some(timestamp)) =
            fields
        {
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    if bars.is_empty() {
        return Err(Report::new(MarketDataError::NoData {
            symbol: symbol.to_owned(),
        }));
    }

    Ok(bars)
}
