//! Per-run execution state machine
//!
//! A `Tactician` owns exactly one running strategy: its sliding window, its
//! capital/position ledger and the scheduled loop that ticks it. The ledger is
//! mutated only on confirmed fills, so a failed exchange call can never
//! corrupt the accounting; everything else about a tick is recorded in the
//! trade log, HOLD ticks included.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{interval_to_seconds, RunConfig};
use crate::data::{Bar, Window};
use crate::exchange::{ExchangeGateway, OrderSide};
use crate::store::{MetadataStore, TradeLogEntry};
use crate::strategy::{Signal, Strategy};
use crate::Result;

/// Mutable per-run ledger. Owned exclusively by its Tactician; never shared
/// across runs.
#[derive(Debug, Clone)]
pub struct RunState {
    pub run_id: String,
    /// Quote-asset balance, never negative
    pub capital: f64,
    /// Base-asset quantity, never negative
    pub position: f64,
    /// Direction of the last successfully executed order
    pub last_action: Option<OrderSide>,
    pub is_running: bool,
    /// Count of successfully executed orders (a round trip is two)
    pub trade_count: u64,
}

impl RunState {
    fn new(run_id: String, capital: f64) -> Self {
        Self {
            run_id,
            capital,
            position: 0.0,
            last_action: None,
            is_running: false,
            trade_count: 0,
        }
    }
}

/// The per-run scheduling state machine.
pub struct Tactician {
    run_id: String,
    config: RunConfig,
    strategy: Box<dyn Strategy>,
    gateway: Arc<dyn ExchangeGateway>,
    store: Arc<dyn MetadataStore>,
    state: RunState,
    window: Window,
}

impl Tactician {
    pub fn new(
        run_id: String,
        config: RunConfig,
        strategy: Box<dyn Strategy>,
        gateway: Arc<dyn ExchangeGateway>,
        store: Arc<dyn MetadataStore>,
    ) -> Self {
        let state = RunState::new(run_id.clone(), config.capital);
        let window = Window::new(config.dataset_size);
        Self {
            run_id,
            config,
            strategy,
            gateway,
            store,
            state,
            window,
        }
    }

    /// Fill the window with historical bars before the loop starts.
    ///
    /// Runs synchronously inside `start()`, so a dead gateway fails the start
    /// instead of producing a spinning run with no data.
    pub async fn warm_up(&mut self) -> Result<()> {
        let bars = self
            .gateway
            .get_window_data(
                &self.config.symbol,
                &self.config.interval,
                self.config.dataset_size,
                None,
            )
            .await?;
        if bars.is_empty() {
            anyhow::bail!(
                "gateway returned no historical bars for {} {}",
                self.config.symbol,
                self.config.interval
            );
        }
        if bars.len() < self.config.dataset_size {
            warn!(
                run_id = %self.run_id,
                got = bars.len(),
                wanted = self.config.dataset_size,
                "short initial window"
            );
        }
        for bar in bars {
            self.window.slide(bar);
        }
        Ok(())
    }

    /// The scheduling loop. Consumes the Tactician; ticks strictly
    /// sequentially until the stop flag is observed or the trade limit is
    /// reached at the top of a tick.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        let period = Duration::from_secs(interval_to_seconds(&self.config.interval));
        // First deadline one full period out; a zero-delay first tick would
        // run the opening two iterations back to back.
        let mut timer = tokio::time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.state.is_running = true;
        info!(
            run_id = %self.run_id,
            strategy = self.strategy.name(),
            symbol = %self.config.symbol,
            interval = %self.config.interval,
            "run loop started"
        );

        loop {
            if *stop.borrow() {
                info!(run_id = %self.run_id, "stop requested, exiting loop");
                break;
            }
            // trades_limit counts round trips; the check sits before signal
            // generation so a natural stop always lands on a completed sell.
            if self.state.trade_count >= 2 * self.config.trades_limit {
                info!(
                    run_id = %self.run_id,
                    trade_count = self.state.trade_count,
                    "trade limit reached, exiting loop"
                );
                break;
            }

            self.tick().await;

            tokio::select! {
                _ = timer.tick() => {}
                _ = stop.changed() => {}
            }
        }

        self.state.is_running = false;
        info!(
            run_id = %self.run_id,
            capital = self.state.capital,
            position = self.state.position,
            trade_count = self.state.trade_count,
            "run loop finished"
        );
    }

    /// One scheduling tick: fetch, slide, signal, execute, log.
    async fn tick(&mut self) {
        let bar = match self.next_bar().await {
            Some(bar) => bar,
            None => {
                error!(run_id = %self.run_id, "no market data and empty window, skipping tick");
                return;
            }
        };
        self.window.slide(bar.clone());

        let signal = self.strategy.generate_signals(&self.window);
        debug!(run_id = %self.run_id, %signal, price = bar.close, "tick evaluated");

        let entry = match signal {
            Signal::Buy => self.execute_buy(&bar).await,
            Signal::Sell => self.execute_sell(&bar).await,
            other => self.log_entry(&bar, other, None, None, "hold"),
        };

        if let Err(e) = self.store.append_log(&self.run_id, entry).await {
            error!(run_id = %self.run_id, error = %e, "failed to append trade log entry");
        }
    }

    /// Pull the newest market point, degrading to the most recent window
    /// entry when the fetch fails so the loop keeps its cadence.
    async fn next_bar(&mut self) -> Option<Bar> {
        let fetched = if self.strategy.is_price_only() {
            match self.gateway.get_latest_price(&self.config.symbol).await {
                Ok(Some(price)) => Some(Bar::from_price(Utc::now(), price)),
                Ok(None) => None,
                Err(e) => {
                    warn!(run_id = %self.run_id, error = %e, "price fetch failed");
                    None
                }
            }
        } else {
            match self
                .gateway
                .get_latest_bar(&self.config.symbol, &self.config.interval)
                .await
            {
                Ok(Some(bar)) => Some(bar),
                Ok(None) => None,
                Err(e) => {
                    warn!(run_id = %self.run_id, error = %e, "bar fetch failed");
                    None
                }
            }
        };

        match fetched {
            Some(bar) => Some(bar),
            None => {
                warn!(run_id = %self.run_id, "data fetch failed, reusing newest window entry");
                self.window.last().cloned()
            }
        }
    }

    /// Guarded buy: suppressed after a buy or when capital is at or below the
    /// exchange minimum; the ledger moves only on a confirmed fill.
    async fn execute_buy(&mut self, bar: &Bar) -> TradeLogEntry {
        let min_notional = match self.gateway.minimum_notional(&self.config.symbol).await {
            Ok(v) => v,
            Err(e) => {
                warn!(run_id = %self.run_id, error = %e, "minimum notional lookup failed");
                return self.log_entry(bar, Signal::InvalidBuy, None, None, "rejected");
            }
        };

        if self.state.last_action == Some(OrderSide::Buy) {
            debug!(run_id = %self.run_id, "consecutive buy suppressed");
            return self.log_entry(bar, Signal::InvalidBuy, None, None, "rejected");
        }
        if self.state.capital <= min_notional {
            debug!(
                run_id = %self.run_id,
                capital = self.state.capital,
                min_notional,
                "buy suppressed, capital at or below minimum notional"
            );
            return self.log_entry(bar, Signal::InvalidBuy, None, None, "rejected");
        }

        match self
            .gateway
            .place_buy(&self.config.symbol, self.state.capital)
            .await
        {
            Ok(fill) => {
                self.state.position += fill.filled_base_qty;
                self.state.capital -= fill.filled_quote_cost;
                self.state.last_action = Some(OrderSide::Buy);
                self.state.trade_count += 1;
                info!(
                    run_id = %self.run_id,
                    order_id = %fill.order_id,
                    qty = fill.filled_base_qty,
                    cost = fill.filled_quote_cost,
                    "buy filled"
                );
                self.log_entry(
                    bar,
                    Signal::Buy,
                    Some(fill.order_id),
                    Some(fill.filled_quote_cost),
                    "filled",
                )
            }
            Err(e) => {
                warn!(run_id = %self.run_id, error = %e, "buy order failed, ledger unchanged");
                self.log_entry(bar, Signal::InvalidBuy, None, None, "rejected")
            }
        }
    }

    /// Guarded sell: suppressed after a sell or with nothing to sell.
    async fn execute_sell(&mut self, bar: &Bar) -> TradeLogEntry {
        if self.state.last_action == Some(OrderSide::Sell) || self.state.position <= 0.0 {
            debug!(run_id = %self.run_id, "sell suppressed");
            return self.log_entry(bar, Signal::InvalidSell, None, None, "rejected");
        }

        match self
            .gateway
            .place_sell(&self.config.symbol, self.state.position)
            .await
        {
            Ok(fill) => {
                self.state.capital += fill.filled_quote_proceeds;
                self.state.position -= fill.filled_base_qty;
                self.state.last_action = Some(OrderSide::Sell);
                self.state.trade_count += 1;
                info!(
                    run_id = %self.run_id,
                    order_id = %fill.order_id,
                    qty = fill.filled_base_qty,
                    proceeds = fill.filled_quote_proceeds,
                    "sell filled"
                );
                self.log_entry(
                    bar,
                    Signal::Sell,
                    Some(fill.order_id),
                    Some(fill.filled_quote_proceeds),
                    "filled",
                )
            }
            Err(e) => {
                warn!(run_id = %self.run_id, error = %e, "sell order failed, ledger unchanged");
                self.log_entry(bar, Signal::InvalidSell, None, None, "rejected")
            }
        }
    }

    fn log_entry(
        &self,
        bar: &Bar,
        action: Signal,
        order_id: Option<String>,
        quote_amount: Option<f64>,
        status: &str,
    ) -> TradeLogEntry {
        TradeLogEntry {
            timestamp: Utc::now(),
            price: bar.close,
            action,
            order_id,
            quote_amount,
            status: status.to_string(),
        }
    }

    /// Read-only view of the ledger (used by tests and diagnostics).
    pub fn state(&self) -> &RunState {
        &self.state
    }
}
