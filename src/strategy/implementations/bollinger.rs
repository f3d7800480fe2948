//! Bollinger band breakout strategy

use anyhow::Result;
use ta::indicators::BollingerBands;
use ta::Next;
use tracing::debug;

use crate::data::Window;
use crate::strategy::{Signal, Strategy};

/// Buys when the close breaks below the lower band, sells when it breaks
/// above the upper band.
#[derive(Debug)]
pub struct BollingerStrategy {
    period: usize,
    std_dev: f64,
}

impl BollingerStrategy {
    pub fn new(period: usize, std_dev: f64) -> Result<Self> {
        if period < 2 {
            return Err(anyhow::anyhow!("Bollinger period must be at least 2"));
        }
        if std_dev <= 0.0 {
            return Err(anyhow::anyhow!("std_dev multiplier must be positive"));
        }
        Ok(Self { period, std_dev })
    }
}

impl Strategy for BollingerStrategy {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn generate_signals(&mut self, window: &Window) -> Signal {
        if window.len() < self.period + 1 {
            return Signal::Hold;
        }
        let mut bb = match BollingerBands::new(self.period, self.std_dev) {
            Ok(bb) => bb,
            Err(_) => return Signal::Hold,
        };

        let closes = window.closes();
        let mut upper = f64::MAX;
        let mut lower = f64::MIN;
        for &close in &closes {
            let out = bb.next(close);
            upper = out.upper;
            lower = out.lower;
        }
        let newest = *closes.last().unwrap_or(&0.0);
        debug!(newest, upper, lower, "bollinger evaluated on newest bar");

        if newest < lower {
            Signal::Buy
        } else if newest > upper {
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
    fn test_crash_below_lower_band_buys() {
        let mut strategy = BollingerStrategy::new(20, 2.0).unwrap();
        let mut closes = vec![100.0; 30];
        closes.push(80.0);
        let window = window_from(&closes);
        assert_eq!(strategy.generate_signals(&window), Signal::Buy);
    }

    #[test]
    fn test_spike_above_upper_band_sells() {
        let mut strategy = BollingerStrategy::new(20, 2.0).unwrap();
        let mut closes = vec![100.0; 30];
        closes.push(120.0);
        let window = window_from(&closes);
        assert_eq!(strategy.generate_signals(&window), Signal::Sell);
    }

    #[test]
    fn test_flat_series_holds() {
        let mut strategy = BollingerStrategy::new(20, 2.0).unwrap();
        let window = window_from(&vec![100.0; 30]);
        assert_eq!(strategy.generate_signals(&window), Signal::Hold);
    }
}
