//! Trend regime detection.
//!
//! SMA(n)[i] = sum(P[i-j] for j in 0..n) / n
//! bullish[i] = P[i] > SMA(n)[i]; a tie is bearish.
//! Warmup: first (n-1) prices produce no output.

use chrono::NaiveDate;
use tracing::debug;

use super::error::VoltrendError;
use super::price::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimePoint {
    pub date: NaiveDate,
    pub is_bullish: bool,
}

pub type RegimeSeries = Vec<RegimePoint>;

/// A maximal stretch of consecutive entries sharing one regime.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_bullish: bool,
    pub periods: usize,
}

pub fn detect(prices: &PriceSeries, window: usize) -> Result<RegimeSeries, VoltrendError> {
    if window < 2 || window > prices.len() {
        return Err(VoltrendError::insufficient(
            "trend regime",
            prices.len(),
            window.max(2),
        ));
    }

    let points = prices.points();
    let mut regime = Vec::with_capacity(points.len() + 1 - window);

    for i in (window - 1)..points.len() {
        let start = i + 1 - window;
        let sma: f64 =
            points[start..=i].iter().map(|p| p.price).sum::<f64>() / window as f64;
        regime.push(RegimePoint {
            date: points[i].date,
            is_bullish: points[i].price > sma,
        });
    }

    debug!(window, emitted = regime.len(), "trend regime detected");
    Ok(regime)
}

pub fn regime_runs(regime: &[RegimePoint]) -> Vec<RegimeRun> {
    let mut runs: Vec<RegimeRun> = Vec::new();
    for point in regime {
        match runs.last_mut() {
            Some(run) if run.is_bullish == point.is_bullish => {
                run.end = point.date;
                run.periods += 1;
            }
            _ => runs.push(RegimeRun {
                start: point.date,
                end: point.date,
                is_bullish: point.is_bullish,
                periods: 1,
            }),
        }
    }
    runs
}

/// Fraction of entries that are bullish.
pub fn time_in_market(regime: &[RegimePoint]) -> f64 {
    if regime.is_empty() {
        return 0.0;
    }
    regime.iter().filter(|p| p.is_bullish).count() as f64 / regime.len() as f64
}
