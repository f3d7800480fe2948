//! Market data structures
//!
//! OHLCV bars and the fixed-capacity sliding window fed to strategies.

pub mod bar;
pub mod window;

pub use bar::*;
pub use window::*;
