//! Exchange integration module
//!
//! Defines the gateway contract the engine polls and trades through, plus a
//! deterministic simulated implementation for offline runs and tests.

pub mod gateway;
pub mod order;
pub mod simulated;

pub use gateway::*;
pub use order::*;
pub use simulated::*;
