//! SVG line charts for reports.

use chrono::{Datelike, NaiveDate};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 260.0;
const PADDING: f64 = 40.0;
const PALETTE: [&str; 6] = ["#e75480", "#1f77b4", "#2ca02c", "#ff7f0e", "#9467bd", "#8c564b"];

/// One named line on a chart.
pub struct ChartLine<'a> {
    pub label: String,
    pub points: &'a [(NaiveDate, f64)],
}

/// Render one or more lines sharing a date axis as a standalone SVG string.
///
/// Returns an empty string when there is nothing to plot. A horizontal rule
/// is drawn at zero when zero lies inside the value range.
pub fn generate_line_svg(title: &str, lines: &[ChartLine<'_>]) -> String {
    let all = lines.iter().flat_map(|l| l.points.iter());
    let (Some(first_day), Some(last_day)) = (
        all.clone().map(|(d, _)| d.num_days_from_ce()).min(),
        all.clone().map(|(d, _)| d.num_days_from_ce()).max(),
    ) else {
        return String::new();
    };
    let min_value = all.clone().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max_value = all.map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let day_span = (last_day - first_day) as f64;
    let scale_x = if day_span > 0.0 {
        plot_width / day_span
    } else {
        0.0
    };
    let range = max_value - min_value;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };

    let x_of = |d: &NaiveDate| PADDING + (d.num_days_from_ce() - first_day) as f64 * scale_x;
    let y_of = |v: f64| HEIGHT - PADDING - (v - min_value) * scale_y;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r#"<rect width="{:.0}" height="{:.0}" fill="white"/>"#,
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        r#"<text x="{:.0}" y="20" font-size="14" font-family="sans-serif">{}</text>"#,
        PADDING,
        escape(title)
    ));
    svg.push_str(&format!(
        r##"<line x1="{p:.0}" y1="{b:.1}" x2="{r:.0}" y2="{b:.1}" stroke="#999"/><line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.1}" stroke="#999"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    ));
    if min_value < 0.0 && max_value > 0.0 {
        svg.push_str(&format!(
            r##"<line x1="{:.0}" y1="{y:.1}" x2="{:.0}" y2="{y:.1}" stroke="#ccc" stroke-dasharray="4 4"/>"##,
            PADDING,
            WIDTH - PADDING,
            y = y_of(0.0)
        ));
    }
    svg.push_str(&format!(
        r#"<text x="4" y="{:.1}" font-size="10" font-family="sans-serif">{}</text><text x="4" y="{:.1}" font-size="10" font-family="sans-serif">{}</text>"#,
        PADDING + 4.0,
        format_tick(max_value),
        HEIGHT - PADDING,
        format_tick(min_value)
    ));

    for (i, line) in lines.iter().enumerate() {
        if line.points.is_empty() {
            continue;
        }
        let color = PALETTE[i % PALETTE.len()];
        let coords: Vec<String> = line
            .points
            .iter()
            .map(|(d, v)| format!("{:.1},{:.1}", x_of(d), y_of(*v)))
            .collect();
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            color,
            coords.join(" ")
        ));
        if lines.len() > 1 {
            svg.push_str(&format!(
                r#"<text x="{:.0}" y="{:.0}" font-size="11" font-family="sans-serif" fill="{}">{}</text>"#,
                WIDTH - PADDING - 120.0,
                20.0 + 14.0 * i as f64,
                color,
                escape(&line.label)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
