//! Typst report generation.
//!
//! Reads a Typst template (either the built-in default or a custom file),
//! resolves all `{{PLACEHOLDER}}` markers by calling helpers from
//! `chart_svg` and `tables`, and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::domain::error::VoltrendError;
use crate::ports::report_port::{ReportData, ReportPort};
use chart_svg::ChartLine;

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, data: &ReportData<'_>, regime_table: bool) -> String {
    let out = data.output;
    let mut output = template.to_string();

    output = output.replace("{{SUMMARY}}", &render_summary(data));
    output = output.replace(
        "{{CONFIG_TABLE}}",
        &tables::render_config_summary(data.symbol, data.config, data.prices),
    );
    output = output.replace(
        "{{PERFORMANCE_TABLE}}",
        &tables::render_summary_table(&out.summary),
    );
    output = output.replace("{{HORIZON_TABLE}}", &tables::render_horizon_table(&out.pnl));

    let pnl_points: Vec<(usize, Vec<(NaiveDate, f64)>)> = out
        .pnl
        .iter()
        .map(|(h, series)| {
            (
                *h,
                series.iter().map(|p| (p.date, p.cumulative_return)).collect(),
            )
        })
        .collect();
    let pnl_lines: Vec<ChartLine<'_>> = pnl_points
        .iter()
        .map(|(h, points)| ChartLine {
            label: format!("{} periods", h),
            points,
        })
        .collect();
    output = output.replace(
        "{{PNL_CHART_SVG}}",
        &embed_svg(
            &chart_svg::generate_line_svg("Cumulative return", &pnl_lines),
            "_No PnL data._",
        ),
    );

    let weights: Vec<(NaiveDate, f64)> = out.positions.iter().map(|p| (p.date, p.weight)).collect();
    output = output.replace(
        "{{POSITION_CHART_SVG}}",
        &embed_svg(
            &chart_svg::generate_line_svg(
                "Position weight",
                &[ChartLine {
                    label: "weight".into(),
                    points: &weights,
                }],
            ),
            "_No position data._",
        ),
    );

    let vols: Vec<(NaiveDate, f64)> = out
        .volatility
        .iter()
        .map(|p| (p.date, p.realized_vol))
        .collect();
    output = output.replace(
        "{{VOLATILITY_CHART_SVG}}",
        &embed_svg(
            &chart_svg::generate_line_svg(
                "Annualized realized volatility",
                &[ChartLine {
                    label: "realized vol".into(),
                    points: &vols,
                }],
            ),
            "_No volatility data._",
        ),
    );

    let runs = if regime_table {
        format!(
            "== Regime Runs\n\n{}",
            tables::render_regime_runs(&out.regime_runs)
        )
    } else {
        String::new()
    };
    output = output.replace("{{REGIME_RUNS}}", &runs);

    output
}

fn render_summary(data: &ReportData<'_>) -> String {
    let out = data.output;
    match (out.regime.last(), out.positions.last()) {
        (Some(regime), Some(position)) => format!(
            "*{}* as of {}: regime is *{}*, target weight *{:.4}*.",
            data.symbol,
            position.date,
            if regime.is_bullish { "bullish" } else { "bearish" },
            position.weight
        ),
        _ => format!("*{}*: not enough history to size a position.", data.symbol),
    }
}

fn embed_svg(svg: &str, fallback: &str) -> String {
    if svg.is_empty() {
        fallback.to_string()
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Writes a resolved Typst document to disk.
pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
    regime_table: bool,
}

impl TypstReportAdapter {
    pub fn new(template_path: Option<PathBuf>, regime_table: bool) -> Self {
        Self {
            template_path,
            regime_table,
        }
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, data: &ReportData<'_>, output_path: &Path) -> Result<(), VoltrendError> {
        let custom;
        let template = match &self.template_path {
            Some(path) => {
                custom = fs::read_to_string(path)?;
                custom.as_str()
            }
            None => default_template::template(),
        };
        let content = resolve(template, data, self.regime_table);
        fs::write(output_path, content)?;
        info!(path = %output_path.display(), "wrote typst report");
        Ok(())
    }
}
