//! Built-in Typst report markup with `{{PLACEHOLDER}}` substitution.

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: 2cm)
#set text(size: 10pt)

= Trend Volatility Report

{{SUMMARY}}

== Configuration

{{CONFIG_TABLE}}

== Performance

{{PERFORMANCE_TABLE}}

== Horizons

{{HORIZON_TABLE}}

== Cumulative PnL

{{PNL_CHART_SVG}}

== Position Weight

{{POSITION_CHART_SVG}}

== Realized Volatility

{{VOLATILITY_CHART_SVG}}

{{REGIME_RUNS}}
"#;

/// The default report layout. Custom templates may use any subset of its
/// placeholders.
pub fn template() -> &'static str {
    TEMPLATE
}
