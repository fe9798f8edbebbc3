//! Realized volatility estimator.
//!
//! Sample standard deviation (n-1 denominator) of the trailing `n` simple
//! returns, annualized by sqrt(annualization_factor).
//! VOL(n)[i] = stdev(r[i-n+1..=i]) * sqrt(A), where r[i] = P[i]/P[i-1] - 1
//! Warmup: first n prices produce no output.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::error::VoltrendError;
use super::price::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub realized_vol: f64,
}

pub type VolatilitySeries = Vec<VolatilityPoint>;

pub fn estimate(
    prices: &PriceSeries,
    window: usize,
    annualization_factor: f64,
) -> Result<VolatilitySeries, VoltrendError> {
    if window < 2 {
        return Err(VoltrendError::invalid_config(
            "vol_window",
            "must be at least 2 for a sample standard deviation",
        ));
    }
    if !annualization_factor.is_finite() || annualization_factor <= 0.0 {
        return Err(VoltrendError::invalid_config(
            "annualization_factor",
            "must be a positive number",
        ));
    }
    if prices.len() < window + 1 {
        return Err(VoltrendError::insufficient(
            "volatility",
            prices.len(),
            window + 1,
        ));
    }

    let returns = prices.simple_returns();
    let scale = annualization_factor.sqrt();
    let mut values = Vec::with_capacity(returns.len() + 1 - window);

    for i in (window - 1)..returns.len() {
        let slice = &returns[i + 1 - window..=i];
        values.push(VolatilityPoint {
            date: returns[i].0,
            realized_vol: sample_stddev(slice.iter().map(|(_, r)| *r)) * scale,
        });
    }

    let flat = values.iter().filter(|v| v.realized_vol == 0.0).count();
    if flat > 0 {
        warn!(flat, "windows with zero realized volatility");
    }
    debug!(window, annualization_factor, emitted = values.len(), "volatility estimated");
    Ok(values)
}

/// Sample standard deviation; windows of identical values give exactly 0.
pub(crate) fn sample_stddev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n < 2 {
        return 0.0;
    }
    let mut iter = values.clone();
    let first = iter.next().unwrap_or_default();
    if iter.all(|v| v == first) {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}
