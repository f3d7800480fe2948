//! Market-condition scoring over a replayed bar series

use ta::indicators::{
    AverageTrueRange, EfficiencyRatio, RateOfChange, RelativeStrengthIndex,
};
use ta::{DataItem, Next};
use tracing::debug;

use crate::data::Bar;

const INDICATOR_PERIOD: usize = 14;
const MOMENTUM_PERIOD: usize = 10;

/// Efficiency ratio above which the market counts as trending and the
/// weighting becomes trend-dominant.
const TREND_THRESHOLD: f64 = 0.35;

/// ATR as a fraction of price at which the volatility sub-score saturates.
const VOLATILITY_SATURATION_PCT: f64 = 5.0;

/// Absolute rate-of-change (percent) at which the momentum sub-score saturates.
const MOMENTUM_SATURATION_PCT: f64 = 10.0;

/// Composite 0-100 market-condition score with its four sub-scores.
///
/// Trend strength uses the efficiency ratio (net price movement over total
/// path length), volatility a price-relative ATR, momentum the rate of
/// change, and extremity the RSI's distance from the 50 midline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketScore {
    pub score: f64,
    pub trend: f64,
    pub volatility: f64,
    pub momentum: f64,
    pub extremity: f64,
}

impl MarketScore {
    fn zero() -> Self {
        Self {
            score: 0.0,
            trend: 0.0,
            volatility: 0.0,
            momentum: 0.0,
            extremity: 0.0,
        }
    }
}

fn sub_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Score a bar series. Fewer bars than the indicator warm-up scores zero.
pub fn market_condition_score(bars: &[Bar]) -> MarketScore {
    if bars.len() <= INDICATOR_PERIOD {
        return MarketScore::zero();
    }

    let (mut er, mut atr, mut roc, mut rsi) = match (
        EfficiencyRatio::new(INDICATOR_PERIOD),
        AverageTrueRange::new(INDICATOR_PERIOD),
        RateOfChange::new(MOMENTUM_PERIOD),
        RelativeStrengthIndex::new(INDICATOR_PERIOD),
    ) {
        (Ok(er), Ok(atr), Ok(roc), Ok(rsi)) => (er, atr, roc, rsi),
        _ => return MarketScore::zero(),
    };

    let mut er_value = 0.0;
    let mut atr_value = 0.0;
    let mut roc_value = 0.0;
    let mut rsi_value = 50.0;
    for bar in bars {
        er_value = er.next(bar.close);
        roc_value = roc.next(bar.close);
        rsi_value = rsi.next(bar.close);
        if let Ok(item) = DataItem::builder()
            .open(bar.open)
            .high(bar.high)
            .low(bar.low)
            .close(bar.close)
            .volume(bar.volume)
            .build()
        {
            atr_value = atr.next(&item);
        }
    }

    let last_close = bars[bars.len() - 1].close;
    if !(last_close.is_finite() && last_close > 0.0) {
        return MarketScore::zero();
    }

    // Indicators divide by path length / average loss, so a flat series can
    // produce NaN; a NaN sub-score reads as "no signal", not a poisoned total.
    let trend = sub_score(er_value * 100.0);
    let atr_pct = atr_value / last_close * 100.0;
    let volatility = sub_score(atr_pct / VOLATILITY_SATURATION_PCT * 100.0);
    let momentum = sub_score(roc_value.abs() / MOMENTUM_SATURATION_PCT * 100.0);
    let extremity = sub_score((rsi_value - 50.0).abs() * 2.0);

    // Trending market: the trend sub-score dominates. Ranging market: the
    // oscillator reading (extremity) dominates.
    let (w_trend, w_vol, w_mom, w_ext) = if er_value > TREND_THRESHOLD {
        (0.40, 0.20, 0.25, 0.15)
    } else {
        (0.20, 0.20, 0.25, 0.35)
    };

    let score = (trend * w_trend + volatility * w_vol + momentum * w_mom + extremity * w_ext)
        .clamp(0.0, 100.0);
    debug!(trend, volatility, momentum, extremity, score, "market condition scored");

    MarketScore {
        score,
        trend,
        volatility,
        momentum,
        extremity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn bars_from(closes: &[f64]) -> Vec<Bar> {
        let start = Utc::now();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    start + Duration::minutes(i as i64),
                    c,
                    c * 1.005,
                    c * 0.995,
                    c,
                    1_000.0,
                    10,
                )
            })
            .collect()
    }

    #[test]
    fn test_short_series_scores_zero() {
        let bars = bars_from(&[100.0; 5]);
        assert_eq!(market_condition_score(&bars), MarketScore::zero());
    }

    #[test]
    fn test_monotonic_trend_scores_high_trend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let score = market_condition_score(&bars_from(&closes));
        assert!(score.trend > 90.0, "trend sub-score was {}", score.trend);
        assert!(score.score > 0.0 && score.score <= 100.0);
    }

    #[test]
    fn test_flat_series_scores_low_and_finite() {
        // Zero path length makes the efficiency ratio divide 0/0; the score
        // must come out finite and inside 0-100 regardless.
        let closes = vec![100.0; 60];
        let score = market_condition_score(&bars_from(&closes));
        assert_eq!(score.trend, 0.0);
        assert!(score.momentum < 1.0);
        assert!(score.score.is_finite());
        assert!((0.0..=100.0).contains(&score.score));
        for sub in [score.trend, score.volatility, score.momentum, score.extremity] {
            assert!(sub.is_finite(), "sub-score leaked a non-finite value");
        }
    }

    #[test]
    fn test_score_is_bounded() {
        // Violent swings should still clamp inside 0-100
        let closes: Vec<f64> = (0..80)
            .map(|i| if i % 2 == 0 { 100.0 } else { 140.0 })
            .collect();
        let score = market_condition_score(&bars_from(&closes));
        assert!((0.0..=100.0).contains(&score.score));
    }
}
