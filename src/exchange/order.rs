//! Order sides and fill reports

use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

/// Fill report for an executed buy order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyFill {
    /// Exchange-assigned order id
    pub order_id: String,
    /// Base-asset quantity received
    pub filled_base_qty: f64,
    /// Quote-asset amount spent
    pub filled_quote_cost: f64,
    /// Average fill price
    pub price: f64,
}

/// Fill report for an executed sell order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellFill {
    /// Exchange-assigned order id
    pub order_id: String,
    /// Base-asset quantity sold
    pub filled_base_qty: f64,
    /// Quote-asset proceeds received
    pub filled_quote_proceeds: f64,
    /// Average fill price
    pub price: f64,
}
