//! RSI threshold strategy

use anyhow::Result;
use ta::indicators::RelativeStrengthIndex;
use ta::Next;
use tracing::debug;

use crate::data::Window;
use crate::strategy::{Signal, Strategy};

/// Buys when RSI drops below the oversold threshold, sells when it rises
/// above the overbought threshold.
#[derive(Debug)]
pub struct RsiStrategy {
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiStrategy {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self> {
        if period == 0 {
            return Err(anyhow::anyhow!("RSI period must be positive"));
        }
        if oversold >= overbought {
            return Err(anyhow::anyhow!(
                "oversold threshold {} must be below overbought threshold {}",
                oversold,
                overbought
            ));
        }
        Ok(Self {
            period,
            oversold,
            overbought,
        })
    }
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn generate_signals(&mut self, window: &Window) -> Signal {
        // ta RSI needs period+1 values before its output is meaningful
        if window.len() < self.period + 1 {
            return Signal::Hold;
        }
        let mut rsi = match RelativeStrengthIndex::new(self.period) {
            Ok(rsi) => rsi,
            Err(_) => return Signal::Hold,
        };

        let mut value = 50.0;
        for close in window.closes() {
            value = rsi.next(close);
        }
        debug!(rsi = value, "rsi evaluated on newest bar");

        if value < self.oversold {
            Signal::Buy
        } else if value > self.overbought {
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
    fn test_short_window_holds() {
        let mut strategy = RsiStrategy::new(14, 30.0, 70.0).unwrap();
        let window = window_from(&[100.0, 101.0, 102.0]);
        assert_eq!(strategy.generate_signals(&window), Signal::Hold);
    }

    #[test]
    fn test_declining_prices_buy() {
        let mut strategy = RsiStrategy::new(14, 30.0, 70.0).unwrap();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let window = window_from(&closes);
        assert_eq!(strategy.generate_signals(&window), Signal::Buy);
    }

    #[test]
    fn test_rising_prices_sell() {
        let mut strategy = RsiStrategy::new(14, 30.0, 70.0).unwrap();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let window = window_from(&closes);
        assert_eq!(strategy.generate_signals(&window), Signal::Sell);
    }

    #[test]
    fn test_invalid_params() {
        assert!(RsiStrategy::new(0, 30.0, 70.0).is_err());
        assert!(RsiStrategy::new(14, 70.0, 30.0).is_err());
    }
}
