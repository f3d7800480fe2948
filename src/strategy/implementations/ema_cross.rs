//! EMA crossover strategy

use anyhow::Result;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;
use tracing::debug;

use crate::data::Window;
use crate::strategy::{Signal, Strategy};

/// Buys when the fast EMA crosses above the slow EMA on the newest bar,
/// sells on the opposite cross.
#[derive(Debug)]
pub struct EmaCrossStrategy {
    fast: usize,
    slow: usize,
}

impl EmaCrossStrategy {
    pub fn new(fast: usize, slow: usize) -> Result<Self> {
        if fast == 0 || slow == 0 {
            return Err(anyhow::anyhow!("EMA periods must be positive"));
        }
        if fast >= slow {
            return Err(anyhow::anyhow!(
                "fast period {} must be less than slow period {}",
                fast,
                slow
            ));
        }
        Ok(Self { fast, slow })
    }
}

impl Strategy for EmaCrossStrategy {
    fn name(&self) -> &str {
        "ema_cross"
    }

    fn generate_signals(&mut self, window: &Window) -> Signal {
        if window.len() < self.slow + 1 {
            return Signal::Hold;
        }
        let (mut fast_ema, mut slow_ema) = match (
            ExponentialMovingAverage::new(self.fast),
            ExponentialMovingAverage::new(self.slow),
        ) {
            (Ok(f), Ok(s)) => (f, s),
            _ => return Signal::Hold,
        };

        let mut prev_spread = 0.0;
        let mut spread = 0.0;
        for close in window.closes() {
            prev_spread = spread;
            spread = fast_ema.next(close) - slow_ema.next(close);
        }
        debug!(prev_spread, spread, "ema cross evaluated on newest bar");

        if prev_spread <= 0.0 && spread > 0.0 {
            Signal::Buy
        } else if prev_spread >= 0.0 && spread < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use chrono::Utc;

    fn window_from(closes: &[f64]) -> Window {
        let bars: Vec<Bar> = closes
            .iter()
            .map(|&c| Bar::new(Utc::now(), c, c + 1.0, c - 1.0, c, 100.0, 1))
            .collect();
        Window::from_bars(bars.len(), &bars)
    }

    #[test]
    fn test_recovery_produces_buy_cross() {
        let mut strategy = EmaCrossStrategy::new(5, 15).unwrap();
        let mut closes: Vec<f64> = (0..40).map(|i| 150.0 - i as f64).collect();
        closes.extend((0..30).map(|i| 110.0 + (i as f64) * 2.0));

        let mut saw_buy = false;
        for end in 20..closes.len() {
            if strategy.generate_signals(&window_from(&closes[..end])) == Signal::Buy {
                saw_buy = true;
                break;
            }
        }
        assert!(saw_buy, "recovery never produced an EMA buy cross");
    }

    #[test]
    fn test_steady_trend_holds_after_cross() {
        let mut strategy = EmaCrossStrategy::new(5, 15).unwrap();
        // Monotonic rise: fast stays above slow, no fresh cross on the newest bar
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let window = window_from(&closes);
        assert_eq!(strategy.generate_signals(&window), Signal::Hold);
    }

    #[test]
    fn test_invalid_params() {
        assert!(EmaCrossStrategy::new(21, 9).is_err());
        assert!(EmaCrossStrategy::new(0, 9).is_err());
    }
}
