//! Exchange gateway contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::Bar;
use crate::error::OrderError;
use crate::exchange::{BuyFill, SellFill};
use crate::Result;

/// The contract the engine polls market data and routes orders through.
///
/// Implementations wrap a concrete exchange's REST surface (or a simulation).
/// Data-fetch methods return `Ok(None)` to signal a failed fetch that the tick
/// loop should degrade around rather than abort; order methods return a typed
/// [`OrderError`] so rejection stays ordinary control flow.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Fetch up to `limit` historical bars, oldest first.
    ///
    /// `start_time` bounds the query on the left; `None` means "the most
    /// recent `limit` bars". A single call never returns more than the
    /// exchange's maximum row count, which is why backtest fetches page.
    async fn get_window_data(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Bar>>;

    /// Latest closed bar for the symbol, or `None` on fetch failure.
    async fn get_latest_bar(&self, symbol: &str, interval: &str) -> Result<Option<Bar>>;

    /// Latest traded price for the symbol, or `None` on fetch failure.
    async fn get_latest_price(&self, symbol: &str) -> Result<Option<f64>>;

    /// Place a market buy spending `quote_amount` of the quote asset.
    async fn place_buy(&self, symbol: &str, quote_amount: f64) -> Result<BuyFill, OrderError>;

    /// Place a market sell of `base_qty` of the base asset.
    async fn place_sell(&self, symbol: &str, base_qty: f64) -> Result<SellFill, OrderError>;

    /// Smallest quote-asset notional the exchange accepts for the symbol.
    async fn minimum_notional(&self, symbol: &str) -> Result<f64>;
}
