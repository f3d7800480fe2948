//! Simulated exchange for offline runs and tests
//!
//! Synthesizes a deterministic oscillating price series keyed on the bar
//! timestamp, so warm-up, live polling and paged historical queries all agree
//! on the same series without network access. Every order fills in full at the
//! current synthetic price.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::interval_to_seconds;
use crate::data::Bar;
use crate::error::OrderError;
use crate::exchange::{BuyFill, ExchangeGateway, SellFill};
use crate::Result;

const WAVE_PERIOD_SECS: f64 = 3_600.0;
const WAVE_AMPLITUDE: f64 = 0.08;
const MINIMUM_NOTIONAL: f64 = 10.0;

/// Deterministic in-process gateway.
pub struct SimulatedExchange {
    base_price: f64,
}

impl SimulatedExchange {
    /// Create a simulated exchange oscillating around `base_price`.
    pub fn new(base_price: f64) -> Self {
        Self { base_price }
    }

    fn price_at(&self, timestamp: DateTime<Utc>) -> f64 {
        let phase = timestamp.timestamp() as f64 * std::f64::consts::TAU / WAVE_PERIOD_SECS;
        self.base_price * (1.0 + WAVE_AMPLITUDE * phase.sin())
    }

    fn bar_at(&self, timestamp: DateTime<Utc>, interval_secs: i64) -> Bar {
        let open = self.price_at(timestamp - Duration::seconds(interval_secs));
        let close = self.price_at(timestamp);
        let high = open.max(close) * 1.001;
        let low = open.min(close) * 0.999;
        Bar::new(timestamp, open, high, low, close, 1_000.0, 100)
    }
}

#[async_trait]
impl ExchangeGateway for SimulatedExchange {
    async fn get_window_data(
        &self,
        _symbol: &str,
        interval: &str,
        limit: usize,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Bar>> {
        let step = interval_to_seconds(interval) as i64;
        let bars = match start_time {
            Some(start) => (0..limit)
                .map(|i| self.bar_at(start + Duration::seconds(step * i as i64), step))
                .collect(),
            None => {
                let now = Utc::now();
                (0..limit)
                    .map(|i| {
                        let offset = step * (limit - 1 - i) as i64;
                        self.bar_at(now - Duration::seconds(offset), step)
                    })
                    .collect()
            }
        };
        Ok(bars)
    }

    async fn get_latest_bar(&self, _symbol: &str, interval: &str) -> Result<Option<Bar>> {
        let step = interval_to_seconds(interval) as i64;
        Ok(Some(self.bar_at(Utc::now(), step)))
    }

    async fn get_latest_price(&self, _symbol: &str) -> Result<Option<f64>> {
        Ok(Some(self.price_at(Utc::now())))
    }

    async fn place_buy(&self, _symbol: &str, quote_amount: f64) -> Result<BuyFill, OrderError> {
        if quote_amount < MINIMUM_NOTIONAL {
            return Err(OrderError::Rejected(format!(
                "notional {:.2} below minimum {:.2}",
                quote_amount, MINIMUM_NOTIONAL
            )));
        }
        let price = self.price_at(Utc::now());
        Ok(BuyFill {
            order_id: Uuid::new_v4().to_string(),
            filled_base_qty: quote_amount / price,
            filled_quote_cost: quote_amount,
            price,
        })
    }

    async fn place_sell(&self, _symbol: &str, base_qty: f64) -> Result<SellFill, OrderError> {
        if base_qty <= 0.0 {
            return Err(OrderError::Rejected("sell quantity must be positive".to_string()));
        }
        let price = self.price_at(Utc::now());
        Ok(SellFill {
            order_id: Uuid::new_v4().to_string(),
            filled_base_qty: base_qty,
            filled_quote_proceeds: base_qty * price,
            price,
        })
    }

    async fn minimum_notional(&self, _symbol: &str) -> Result<f64> {
        Ok(MINIMUM_NOTIONAL)
    }
}
