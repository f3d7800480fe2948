//! Built-in strategy implementations

pub mod bollinger;
pub mod ema_cross;
pub mod macd;
pub mod rsi;

pub use bollinger::BollingerStrategy;
pub use ema_cross::EmaCrossStrategy;
pub use macd::MacdStrategy;
pub use rsi::RsiStrategy;
