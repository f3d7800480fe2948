//! Strategy engine module
//!
//! Each strategy is a trait implementation selected from a name-keyed
//! registry. Strategies recompute their indicators from the full window on
//! every call, so the signal depends only on the window contents.

pub mod implementations;
pub mod registry;
pub mod signal;

pub use implementations::*;
pub use registry::{StrategyFactory, StrategyRegistry};
pub use signal::Signal;

use crate::data::Window;

/// Base trait for all trading strategies.
///
/// `generate_signals` maps a window of bars to the newest bar's signal. It is
/// pure with respect to the window contents: indicators are re-fed from the
/// whole window each call for continuity, and only the last bar's signal is
/// the actionable output. Implementations must not fail for any window of the
/// declared capacity; insufficient warm-up resolves to [`Signal::Hold`].
pub trait Strategy: Send + Sync {
    /// Get strategy name
    fn name(&self) -> &str;

    /// Whether the strategy needs only closing prices.
    ///
    /// Decides which gateway call the tick loop issues: `get_latest_price`
    /// when true, `get_latest_bar` otherwise.
    fn is_price_only(&self) -> bool {
        true
    }

    /// Compute the newest bar's signal over the full window.
    fn generate_signals(&mut self, window: &Window) -> Signal;
}
