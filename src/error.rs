//! Error taxonomy for the execution engine

use thiserror::Error;

/// Errors surfaced by the control plane and the run registry.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("run '{0}' not found")]
    RunNotFound(String),

    #[error("run '{0}' is already registered")]
    RunAlreadyExists(String),

    #[error("run '{0}' did not stop within {1} seconds")]
    StopTimeout(String, u64),

    #[error("invalid run configuration: {0}")]
    Config(String),

    #[error("exchange gateway error: {0}")]
    Gateway(String),

    #[error("metadata store error: {0}")]
    Store(String),
}

/// Errors returned by an exchange gateway when an order does not fill.
///
/// A rejected or unfilled order is ordinary control flow for the tick loop:
/// the signal is downgraded to its invalidated form and the ledger is left
/// untouched. Only `Transport` indicates something unexpected happened on the
/// wire.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("order rejected by exchange: {0}")]
    Rejected(String),

    #[error("order accepted but returned no fill")]
    NoFill,

    #[error("transport failure: {0}")]
    Transport(String),
}
