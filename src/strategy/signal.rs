//! Trading signals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar trading signal.
///
/// Strategies only ever emit `Buy`, `Sell` or `Hold`; the invalidated variants
/// are derived by the execution guard (or the backtest bookkeeping) when a
/// signal is suppressed or fails at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "INVALID_BUY")]
    InvalidBuy,
    #[serde(rename = "INVALID_SELL")]
    InvalidSell,
}

impl Signal {
    /// Whether this signal asks for an order to be attempted.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Signal::Buy | Signal::Sell)
    }

    /// The invalidated form of an actionable signal; `Hold` stays `Hold`.
    pub fn invalidated(&self) -> Signal {
        match self {
            Signal::Buy => Signal::InvalidBuy,
            Signal::Sell => Signal::InvalidSell,
            other => *other,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::InvalidBuy => "INVALID_BUY",
            Signal::InvalidSell => "INVALID_SELL",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidated_mapping() {
        assert_eq!(Signal::Buy.invalidated(), Signal::InvalidBuy);
        assert_eq!(Signal::Sell.invalidated(), Signal::InvalidSell);
        assert_eq!(Signal::Hold.invalidated(), Signal::Hold);
    }

    #[test]
    fn test_display_spelling() {
        assert_eq!(Signal::InvalidBuy.to_string(), "INVALID_BUY");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }
}
