//! End-to-end signal and sizing pipeline.
//!
//! Runs regime detection, volatility estimation, position sizing and PnL
//! composition in order over one price series. Re-running with a new
//! [`PipelineConfig`] is the only way to recompute; nothing is cached.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::error::VoltrendError;
use super::metrics::PerformanceSummary;
use super::pnl::{self, PnlSeries};
use super::price::PriceSeries;
use super::regime::{self, RegimeRun, RegimeSeries};
use super::sizing::{self, PositionSeries};
use super::volatility::{self, VolatilitySeries};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub trend_window: usize,
    pub vol_window: usize,
    pub annualization_factor: f64,
    pub target_annual_vol: f64,
    pub max_leverage: f64,
    pub horizons: BTreeSet<usize>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), VoltrendError> {
        if self.trend_window < 2 {
            return Err(VoltrendError::invalid_config(
                "trend_window",
                "must be at least 2",
            ));
        }
        if self.vol_window < 2 {
            return Err(VoltrendError::invalid_config("vol_window", "must be at least 2"));
        }
        if !self.annualization_factor.is_finite() || self.annualization_factor <= 0.0 {
            return Err(VoltrendError::invalid_config(
                "annualization_factor",
                "must be positive",
            ));
        }
        if !self.target_annual_vol.is_finite() || self.target_annual_vol <= 0.0 {
            return Err(VoltrendError::invalid_config(
                "target_annual_vol",
                "must be positive",
            ));
        }
        if !self.max_leverage.is_finite() || self.max_leverage <= 0.0 {
            return Err(VoltrendError::invalid_config("max_leverage", "must be positive"));
        }
        if self.horizons.is_empty() {
            return Err(VoltrendError::invalid_config(
                "horizons",
                "at least one horizon is required",
            ));
        }
        if self.horizons.contains(&0) {
            return Err(VoltrendError::invalid_config(
                "horizons",
                "horizons must be positive",
            ));
        }
        Ok(())
    }

    /// Longest lookback any stage needs before it emits its first value.
    pub fn minimum_prices(&self) -> usize {
        self.trend_window.max(self.vol_window + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub regime: RegimeSeries,
    pub regime_runs: Vec<RegimeRun>,
    pub volatility: VolatilitySeries,
    pub positions: PositionSeries,
    pub pnl: BTreeMap<usize, PnlSeries>,
    pub summary: PerformanceSummary,
}

pub fn run_pipeline(
    prices: &PriceSeries,
    config: &PipelineConfig,
) -> Result<PipelineOutput, VoltrendError> {
    config.validate()?;
    debug!(prices = prices.len(), ?config, "running pipeline");

    let regime = regime::detect(prices, config.trend_window)?;
    let volatility = volatility::estimate(prices, config.vol_window, config.annualization_factor)?;
    let positions = sizing::size(
        &regime,
        &volatility,
        config.target_annual_vol,
        config.max_leverage,
    )?;
    let pnl = pnl::compose(&positions, prices, &config.horizons);

    let returns = pnl::strategy_returns(&positions, prices);
    let summary = PerformanceSummary::compute(&returns, &regime, config.annualization_factor);
    let regime_runs = regime::regime_runs(&regime);

    info!(
        regime = regime.len(),
        volatility = volatility.len(),
        positions = positions.len(),
        horizons = pnl.len(),
        "pipeline complete"
    );

    Ok(PipelineOutput {
        regime,
        regime_runs,
        volatility,
        positions,
        pnl,
        summary,
    })
}
