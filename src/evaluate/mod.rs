//! Performance evaluation over trade logs
//!
//! Pure, best-effort metric derivation: the log is the only authoritative
//! state, metrics are recomputed on demand and never persisted. Evaluation
//! never fails the caller; anything it cannot compute comes back as an empty
//! map, and non-finite values are replaced by an "N/A" sentinel.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::warn;

use crate::store::TradeLogEntry;
use crate::strategy::Signal;

/// Metrics map keyed by metric name.
pub type EvaluationMetrics = BTreeMap<String, Value>;

const RISK_FREE_RATE: f64 = 0.0;

/// Derive performance metrics from a trade log (live or backtest).
///
/// Only executed BUY/SELL entries participate; HOLD and INVALID_* rows are
/// audit noise for this purpose. An empty or action-free log evaluates to an
/// empty map.
pub fn evaluate(log: &[TradeLogEntry]) -> EvaluationMetrics {
    let executed: Vec<&TradeLogEntry> = log
        .iter()
        .filter(|e| matches!(e.action, Signal::Buy | Signal::Sell))
        .collect();

    if executed.is_empty() {
        return EvaluationMetrics::new();
    }

    let prices: Vec<f64> = executed.iter().map(|e| e.price).collect();
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        warn!("trade log contains non-positive or non-finite prices, skipping evaluation");
        return EvaluationMetrics::new();
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    let max_dd = max_drawdown(&prices);
    let total_return_pct = (prices[prices.len() - 1] / prices[0] - 1.0) * 100.0;

    let mut metrics = EvaluationMetrics::new();
    metrics.insert("trade_count".to_string(), json!(executed.len()));
    metrics.insert("total_return".to_string(), finite_or_na(total_return_pct));
    metrics.insert("max_drawdown".to_string(), finite_or_na(max_dd));
    metrics.insert("sharpe_ratio".to_string(), finite_or_na(sharpe_ratio(&returns)));
    metrics.insert("sortino_ratio".to_string(), finite_or_na(sortino_ratio(&returns)));
    metrics.insert(
        "calmar_ratio".to_string(),
        finite_or_na(calmar_ratio(total_return_pct, max_dd)),
    );
    metrics.insert("win_rate".to_string(), finite_or_na(win_rate(&executed)));
    metrics.insert("profit_factor".to_string(), finite_or_na(profit_factor(&executed)));
    metrics
}

/// Maximum peak-to-trough decline over the price series, in percent.
/// The first point has zero drawdown by definition.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = match prices.first() {
        Some(&p) => p,
        None => return 0.0,
    };
    let mut max_dd = 0.0;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        let drawdown = (peak - price) / peak;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd * 100.0
}

/// Mean excess return over total volatility; 0 when volatility is 0.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let std = std_dev(returns);
    if std == 0.0 {
        return 0.0;
    }
    (mean(returns) - RISK_FREE_RATE) / std
}

/// Mean excess return over downside-only volatility; 0 when there are no
/// negative returns.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let downside_std = std_dev(&downside);
    if downside_std == 0.0 {
        return 0.0;
    }
    (mean(returns) - RISK_FREE_RATE) / downside_std
}

/// Return relative to maximum drawdown; 0 when drawdown is 0.
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        return 0.0;
    }
    annualized_return / max_drawdown
}

/// Percentage of SELL entries filled above the immediately preceding
/// executed entry's price.
fn win_rate(executed: &[&TradeLogEntry]) -> f64 {
    let mut sells = 0usize;
    let mut wins = 0usize;
    for pair in executed.windows(2) {
        if pair[1].action == Signal::Sell {
            sells += 1;
            if pair[1].price > pair[0].price {
                wins += 1;
            }
        }
    }
    if sells == 0 {
        return 0.0;
    }
    (wins as f64 / sells as f64) * 100.0
}

/// Gross profit over gross loss across SELL entries. When there are no
/// losses the gross profit itself is returned (0.0 when both sides are 0)
/// rather than an undefined ratio.
fn profit_factor(executed: &[&TradeLogEntry]) -> f64 {
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    for pair in executed.windows(2) {
        if pair[1].action == Signal::Sell {
            let delta = pair[1].price - pair[0].price;
            if delta >= 0.0 {
                gross_profit += delta;
            } else {
                gross_loss += delta.abs();
            }
        }
    }
    if gross_loss == 0.0 {
        return gross_profit;
    }
    gross_profit / gross_loss
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn finite_or_na(value: f64) -> Value {
    if value.is_finite() {
        json!(value)
    } else {
        json!("N/A")
    }
}
