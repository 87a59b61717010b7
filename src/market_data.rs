pub mod yahoo;

use chrono::{DateTime, Utc};
use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::MarketDataError;
use crate::model::Bar;

/// Abstraction over a historical price-data provider.
///
/// Uses `BoxFuture` (from `futures` crate) instead of `async fn` in trait
/// to keep the trait object-safe (`dyn MarketData`).
pub trait MarketData: Send + Sync {
    /// Short provider name used in logs and error reports.
    fn provider(&self) -> &'static str;

    /// Fetch daily bars for `symbol` within `[start, end]`, oldest first.
    ///
    /// An unknown symbol or an empty range is an explicit
    /// `MarketDataError::NoData`, not an empty vector.
    fn fetch_daily(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Vec<Bar>, Report<MarketDataError>>>;
}
