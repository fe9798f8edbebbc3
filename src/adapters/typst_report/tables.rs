//! Table formatting for reports.
//!
//! Provides Typst markup for the configuration summary, the performance
//! summary, per-horizon results and the regime run log.

use std::collections::BTreeMap;

use crate::domain::metrics::PerformanceSummary;
use crate::domain::pipeline::PipelineConfig;
use crate::domain::pnl::PnlSeries;
use crate::domain::price::PriceSeries;
use crate::domain::regime::RegimeRun;

pub fn render_config_summary(symbol: &str, config: &PipelineConfig, prices: &PriceSeries) -> String {
    let horizons: Vec<String> = config.horizons.iter().map(|h| h.to_string()).collect();
    let span = match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "-".to_string(),
    };

    let mut out = String::from("#table(\n  columns: 2,\n  [*Property*], [*Value*],\n");
    out.push_str(&format!("  [Symbol], [{}],\n", symbol));
    out.push_str(&format!("  [Data], [{} ({} prices)],\n", span, prices.len()));
    out.push_str(&format!("  [Trend Window], [{}],\n", config.trend_window));
    out.push_str(&format!("  [Volatility Window], [{}],\n", config.vol_window));
    out.push_str(&format!(
        "  [Annualization Factor], [{}],\n",
        config.annualization_factor
    ));
    out.push_str(&format!(
        "  [Target Volatility], [{:.2}%],\n",
        config.target_annual_vol * 100.0
    ));
    out.push_str(&format!("  [Max Leverage], [{:.2}x],\n", config.max_leverage));
    out.push_str(&format!("  [Horizons], [{}],\n", horizons.join(", ")));
    out.push(')');
    out
}

pub fn render_summary_table(summary: &PerformanceSummary) -> String {
    let mut out = String::from("#table(\n  columns: 2,\n  [*Metric*], [*Value*],\n");
    out.push_str(&format!(
        "  [Total Return], [{:.2}%],\n",
        summary.total_return * 100.0
    ));
    out.push_str(&format!(
        "  [Annual Return], [{:.2}%],\n",
        summary.annualized_return * 100.0
    ));
    out.push_str(&format!(
        "  [Annual Volatility], [{:.2}%],\n",
        summary.annualized_volatility * 100.0
    ));
    out.push_str(&format!("  [Sharpe Ratio], [{:.2}],\n", summary.sharpe_ratio));
    out.push_str(&format!(
        "  [Max Drawdown], [-{:.2}%],\n",
        summary.max_drawdown * 100.0
    ));
    out.push_str(&format!(
        "  [Time in Market], [{:.1}%],\n",
        summary.time_in_market * 100.0
    ));
    out.push_str(&format!("  [Periods], [{}],\n", summary.periods));
    out.push(')');
    out
}

pub fn render_horizon_table(pnl: &BTreeMap<usize, PnlSeries>) -> String {
    let mut out = String::from(
        "#table(\n  columns: 4,\n  align: (right, left, right, right),\n  [*Horizon*], [*Start*], [*Periods*], [*Cumulative*],\n",
    );
    for (horizon, series) in pnl {
        let start = series
            .first()
            .map(|p| p.date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let cumulative = series.last().map(|p| p.cumulative_return).unwrap_or(0.0);
        let color = if cumulative >= 0.0 { "green" } else { "red" };
        out.push_str(&format!(
            "  [{}], [{}], [{}], text(fill: {}, [{:.2}%]),\n",
            horizon,
            start,
            series.len(),
            color,
            cumulative * 100.0
        ));
    }
    out.push(')');
    out
}

pub fn render_regime_runs(runs: &[RegimeRun]) -> String {
    if runs.is_empty() {
        return "_No regime data._".to_string();
    }

    let bullish: Vec<&RegimeRun> = runs.iter().filter(|r| r.is_bullish).collect();
    let bearish = runs.len() - bullish.len();
    let avg_bull = if bullish.is_empty() {
        0.0
    } else {
        bullish.iter().map(|r| r.periods).sum::<usize>() as f64 / bullish.len() as f64
    };

    let mut out = format!(
        "{} bullish runs (average {:.1} periods), {} bearish runs.\n\n",
        bullish.len(),
        avg_bull,
        bearish
    );
    out.push_str("#table(\n  columns: 5,\n  [*#*], [*Regime*], [*Start*], [*End*], [*Periods*],\n");
    for (i, run) in runs.iter().enumerate() {
        let (label, color) = if run.is_bullish {
            ("Bullish", "green")
        } else {
            ("Bearish", "red")
        };
        out.push_str(&format!(
            "  [{}], text(fill: {}, [{}]), [{}], [{}], [{}],\n",
            i + 1,
            color,
            label,
            run.start,
            run.end,
            run.periods
        ));
    }
    out.push(')');
    out
}
