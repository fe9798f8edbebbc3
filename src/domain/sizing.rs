//! Volatility-targeted position sizing.
//!
//! weight = 0                                   if bearish
//!        = max_leverage                        if bullish and vol == 0
//!        = min(target / vol, max_leverage)     otherwise

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use super::error::VoltrendError;
use super::regime::RegimePoint;
use super::volatility::VolatilityPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

pub type PositionSeries = Vec<PositionPoint>;

pub fn size(
    regime: &[RegimePoint],
    vol: &[VolatilityPoint],
    target_annual_vol: f64,
    max_leverage: f64,
) -> Result<PositionSeries, VoltrendError> {
    if !target_annual_vol.is_finite() || target_annual_vol <= 0.0 {
        return Err(VoltrendError::invalid_config(
            "target_annual_vol",
            "must be a positive number",
        ));
    }
    if !max_leverage.is_finite() || max_leverage <= 0.0 {
        return Err(VoltrendError::invalid_config(
            "max_leverage",
            "must be a positive number",
        ));
    }

    let vol_by_date: HashMap<NaiveDate, f64> =
        vol.iter().map(|v| (v.date, v.realized_vol)).collect();

    let positions: PositionSeries = regime
        .iter()
        .filter_map(|r| {
            vol_by_date.get(&r.date).map(|&realized_vol| PositionPoint {
                date: r.date,
                weight: target_weight(r.is_bullish, realized_vol, target_annual_vol, max_leverage),
            })
        })
        .collect();

    debug!(
        regime = regime.len(),
        vol = vol.len(),
        emitted = positions.len(),
        "positions sized"
    );
    Ok(positions)
}

fn target_weight(is_bullish: bool, realized_vol: f64, target: f64, max_leverage: f64) -> f64 {
    if !is_bullish {
        0.0
    } else if realized_vol == 0.0 {
        max_leverage
    } else {
        (target / realized_vol).min(max_leverage)
    }
}
