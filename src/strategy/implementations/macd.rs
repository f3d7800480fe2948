//! MACD histogram cross strategy

use anyhow::Result;
use ta::indicators::MovingAverageConvergenceDivergence;
use ta::Next;
use tracing::debug;

use crate::data::Window;
use crate::strategy::{Signal, Strategy};

/// Buys when the MACD histogram crosses above zero on the newest bar, sells
/// when it crosses below.
#[derive(Debug)]
pub struct MacdStrategy {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdStrategy {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(anyhow::anyhow!("MACD periods must be positive"));
        }
        if fast >= slow {
            return Err(anyhow::anyhow!(
                "fast period {} must be less than slow period {}",
                fast,
                slow
            ));
        }
        Ok(Self { fast, slow, signal })
    }

    fn warmup(&self) -> usize {
        self.slow + self.signal
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        "macd"
    }

    fn generate_signals(&mut self, window: &Window) -> Signal {
        if window.len() < self.warmup() + 1 {
            return Signal::Hold;
        }
        let mut macd =
            match MovingAverageConvergenceDivergence::new(self.fast, self.slow, self.signal) {
                Ok(macd) => macd,
                Err(_) => return Signal::Hold,
            };

        let mut prev_histogram = 0.0;
        let mut histogram = 0.0;
        for close in window.closes() {
            prev_histogram = histogram;
            histogram = macd.next(close).histogram;
        }
        debug!(prev_histogram, histogram, "macd evaluated on newest bar");

        if prev_histogram <= 0.0 && histogram > 0.0 {
            Signal::Buy
        } else if prev_histogram >= 0.0 && histogram < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
