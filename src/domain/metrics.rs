//! Performance summary over the full strategy return series.

use super::pnl::StrategyReturn;
use super::regime::{RegimePoint, time_in_market};
use super::volatility::sample_stddev;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub time_in_market: f64,
    pub periods: usize,
}

impl PerformanceSummary {
    pub fn compute(
        returns: &[StrategyReturn],
        regime: &[RegimePoint],
        annualization_factor: f64,
    ) -> Self {
        let periods = returns.len();
        let series = returns.iter().map(|r| r.strategy_return);

        let total_return = series.clone().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;

        let annualized_return = if periods > 0 {
            series.clone().sum::<f64>() / periods as f64 * annualization_factor
        } else {
            0.0
        };

        let annualized_volatility = sample_stddev(series) * annualization_factor.sqrt();

        let sharpe_ratio = if annualized_volatility > 0.0 {
            annualized_return / annualized_volatility
        } else {
            0.0
        };

        PerformanceSummary {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: compute_drawdown(returns),
            time_in_market: time_in_market(regime),
            periods,
        }
    }
}

/// Largest peak-to-trough fall of the compounded wealth curve, starting at 1.
fn compute_drawdown(returns: &[StrategyReturn]) -> f64 {
    let mut wealth = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for r in returns {
        wealth *= 1.0 + r.strategy_return;
        if wealth > peak {
            peak = wealth;
        } else if peak > 0.0 {
            let dd = (peak - wealth) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_returns(values: &[f64]) -> Vec<StrategyReturn> {
        values
            .iter()
            .enumerate()
            .map(|(i, &r)| StrategyReturn {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
                weight: 1.0,
                forward_return: r,
                strategy_return: r,
            })
            .collect()
    }

    #[test]
    fn summary_empty() {
        let summary = PerformanceSummary::compute(&[], &[], 252.0);
        assert_eq!(summary.periods, 0);
        assert!((summary.total_return - 0.0).abs() < f64::EPSILON);
        assert!((summary.annualized_return - 0.0).abs() < f64::EPSILON);
        assert!((summary.sharpe_ratio - 0.0).abs() < f64::EPSILON);
        assert!((summary.max_drawdown - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_total_return_compounds() {
        let summary = PerformanceSummary::compute(&make_returns(&[0.1, -0.1]), &[], 252.0);
        assert!((summary.total_return - (-0.01)).abs() < 1e-12);
    }

    #[test]
    fn summary_annualized_return_is_mean_times_factor() {
        let summary = PerformanceSummary::compute(&make_returns(&[0.01, 0.03]), &[], 252.0);
        assert!((summary.annualized_return - 0.02 * 252.0).abs() < 1e-9);
    }

    #[test]
    fn summary_sharpe() {
        let summary = PerformanceSummary::compute(&make_returns(&[0.01, 0.03, 0.02]), &[], 252.0);
        // mean 0.02, sample stdev 0.01
        assert!((summary.annualized_volatility - 0.01 * 252.0_f64.sqrt()).abs() < 1e-9);
        assert!((summary.sharpe_ratio - 2.0 * 252.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn summary_zero_vol_sharpe_is_zero() {
        let summary = PerformanceSummary::compute(&make_returns(&[0.01, 0.01, 0.01]), &[], 252.0);
        assert_eq!(summary.annualized_volatility, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
    }

    #[test]
    fn drawdown_from_peak() {
        // wealth: 1.1, 0.99, 1.089, 0.8712
        let dd = compute_drawdown(&make_returns(&[0.1, -0.1, 0.1, -0.2]));
        assert!((dd - (1.1 - 0.8712) / 1.1).abs() < 1e-9);
    }

    #[test]
    fn drawdown_monotonic_gain_is_zero() {
        assert_eq!(compute_drawdown(&make_returns(&[0.01, 0.02, 0.03])), 0.0);
    }

    #[test]
    fn time_in_market_from_regime() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let regime = vec![
            RegimePoint { date, is_bullish: true },
            RegimePoint { date, is_bullish: false },
            RegimePoint { date, is_bullish: true },
            RegimePoint { date, is_bullish: true },
        ];
        let summary = PerformanceSummary::compute(&[], &regime, 252.0);
        assert!((summary.time_in_market - 0.75).abs() < f64::EPSILON);
    }
}
