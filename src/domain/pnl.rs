//! Cumulative strategy performance over one or more horizons.
//!
//! A position held at `t` earns the next period's return:
//! strat_r[t] = weight[t] * (P[t+1] / P[t] - 1)
//! Each horizon `h` compounds the most recent `h` periods independently.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::price::PriceSeries;
use super::sizing::PositionPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub cumulative_return: f64,
}

pub type PnlSeries = Vec<PnlPoint>;

/// One period of strategy return, dated at the position that earned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyReturn {
    pub date: NaiveDate,
    pub weight: f64,
    pub forward_return: f64,
    pub strategy_return: f64,
}

/// Strategy returns for every position that has a following price.
///
/// Positions dated on the last price, or on a date missing from `prices`,
/// contribute no period.
pub fn strategy_returns(positions: &[PositionPoint], prices: &PriceSeries) -> Vec<StrategyReturn> {
    let points = prices.points();
    positions
        .iter()
        .filter_map(|pos| {
            let i = prices.index_of(pos.date)?;
            let next = points.get(i + 1)?;
            let forward_return = next.price / points[i].price - 1.0;
            Some(StrategyReturn {
                date: pos.date,
                weight: pos.weight,
                forward_return,
                strategy_return: pos.weight * forward_return,
            })
        })
        .collect()
}

/// Compound a run of strategy returns into a cumulative series.
pub fn compound(returns: &[StrategyReturn]) -> PnlSeries {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r.strategy_return;
            PnlPoint {
                date: r.date,
                cumulative_return: wealth - 1.0,
            }
        })
        .collect()
}

pub fn compose(
    positions: &[PositionPoint],
    prices: &PriceSeries,
    horizons: &BTreeSet<usize>,
) -> BTreeMap<usize, PnlSeries> {
    let periods = strategy_returns(positions, prices);

    horizons
        .iter()
        .map(|&h| {
            if h > periods.len() && !periods.is_empty() {
                warn!(
                    horizon = h,
                    available = periods.len(),
                    "horizon exceeds history, using full span"
                );
            }
            let start = periods.len().saturating_sub(h);
            let series = compound(&periods[start..]);
            debug!(horizon = h, emitted = series.len(), "horizon composed");
            (h, series)
        })
        .collect()
}
