//! Unit tests over the public API

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use tactician::config::{interval_to_seconds, RunConfig};
    use tactician::data::{Bar, Window};
    use tactician::evaluate::{evaluate, max_drawdown};
    use tactician::store::TradeLogEntry;
    use tactician::strategy::{Signal, StrategyRegistry};

    #[test]
    fn test_bar_creation() {
        let bar = Bar::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000.0, 42);
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.close, 105.0);
        assert!(bar.is_bullish());
        assert_eq!(bar.range(), 15.0);
        assert_eq!(bar.typical_price(), (110.0 + 95.0 + 105.0) / 3.0);
    }

    #[test]
    fn test_window_keeps_capacity() {
        let mut window = Window::new(3);
        let start = Utc::now();
        for i in 0..10 {
            window.slide(Bar::from_price(start + Duration::minutes(i), i as f64));
            assert!(window.len() <= 3);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.closes(), vec![7.0, 8.0, 9.0]);
        assert_eq!(window.last().unwrap().close, 9.0);
    }

    #[test]
    fn test_signal_wire_format() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(
            serde_json::to_string(&Signal::InvalidSell).unwrap(),
            "\"INVALID_SELL\""
        );
        let parsed: Signal = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(parsed, Signal::Hold);
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!(interval_to_seconds("5m"), 300);
        assert_eq!(interval_to_seconds("4h"), 14400);
        assert_eq!(interval_to_seconds("bogus"), 60);
    }

    #[test]
    fn test_run_config_validation() {
        assert!(RunConfig::new("rsi", "BTCUSDT").validate().is_ok());

        let mut config = RunConfig::new("rsi", "BTCUSDT");
        config.trades_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_registry_builtins() {
        let registry = StrategyRegistry::new();
        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["bollinger", "ema_cross", "macd", "rsi"]);

        let strategy = registry.create("macd", &json!({"fast": 5, "slow": 13})).unwrap();
        assert_eq!(strategy.name(), "macd");
    }

    #[tokio::test]
    async fn test_rejected_order_surfaces_typed_error() {
        use tactician::error::OrderError;
        use tactician::exchange::{ExchangeGateway, SimulatedExchange};

        let exchange = SimulatedExchange::new(100.0);
        // The crate Result alias carries the typed error side here
        let result: tactician::Result<_, OrderError> = exchange.place_buy("BTCUSDT", 1.0).await;
        assert!(matches!(result, Err(OrderError::Rejected(_))));
    }

    #[test]
    fn test_prelude_exports_control_plane_types() {
        use tactician::prelude::*;

        let registry = StrategyRegistry::new();
        assert!(registry.contains("rsi"));
        let config = RunConfig::new("rsi", "BTCUSDT");
        assert!(config.validate().is_ok());
        assert_eq!(Signal::Buy.invalidated(), Signal::InvalidBuy);
    }

    #[test]
    fn test_drawdown_and_evaluation() {
        assert_eq!(max_drawdown(&[10.0, 8.0, 12.0, 6.0]), 50.0);

        let entry = |action, price| TradeLogEntry {
            timestamp: Utc::now(),
            price,
            action,
            order_id: None,
            quote_amount: None,
            status: "filled".to_string(),
        };
        let log = vec![
            entry(Signal::Buy, 10.0),
            entry(Signal::Sell, 12.0),
            entry(Signal::Buy, 11.0),
            entry(Signal::Sell, 9.0),
        ];
        let metrics = evaluate(&log);
        assert_eq!(metrics["win_rate"], json!(50.0));
        assert_eq!(metrics["profit_factor"], json!(1.0));
        assert!(evaluate(&[]).is_empty());
    }
}
