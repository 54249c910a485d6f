//! HTML report for a single trade
//!
//! Generates a self-contained HTML page with the breakdown and an inline SVG chart.

use super::breakdown::{summary_items, Emphasis};
use super::guide;
use super::{evaluate_or_exit, TradeArgs};
use crate::core::{ChartKind, ChartSeries, GainResult, TradeInput};
use crate::format::{format_inr, format_pct, format_whole_inr};
use clap::{Args, ValueEnum};
use rust_decimal::prelude::ToPrimitive;
use std::path::PathBuf;

const TEMPLATE: &str = include_str!("html/template.html");

const CHART_WIDTH: f64 = 560.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 40.0;
const PIE_START_ANGLE: f64 = 140.0;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    trade: TradeArgs,

    /// Page colour scheme
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (input, result) = evaluate_or_exit(self.trade.to_record());
        let html = generate(&input, &result, self.theme);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            log::info!("Wrote {} bytes to {}", html.len(), output_path.display());
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("gainc-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Dark mode switch. Only affects page styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colours used by the page and chart
#[derive(Debug, PartialEq, Eq)]
pub struct ThemeStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub panel: &'static str,
    pub accent: &'static str,
    pub grid: &'static str,
    pub success_background: &'static str,
    pub success_text: &'static str,
}

static LIGHT: ThemeStyle = ThemeStyle {
    background: "#ffffff",
    text: "#262730",
    panel: "#f0f2f6",
    accent: "#ff4b4b",
    grid: "#262730",
    success_background: "#e8f5e9",
    success_text: "#1b5e20",
};

static DARK: ThemeStyle = ThemeStyle {
    background: "#121212",
    text: "#e0e0e0",
    panel: "#1e1e1e",
    accent: "#007acc",
    grid: "#e0e0e0",
    success_background: "#1b3a20",
    success_text: "#a5d6a7",
};

impl Theme {
    pub fn style(&self) -> &'static ThemeStyle {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

/// Generate the HTML page
pub fn generate(input: &TradeInput, result: &GainResult, theme: Theme) -> String {
    let style = theme.style();
    let series = ChartSeries::from(result);
    let chart = match series.resolve(input.chart()) {
        ChartKind::Bar => svg_bar_chart(&series, style),
        ChartKind::Pie => svg_pie_chart(&series, style),
    };

    TEMPLATE
        .replace("__CSS__", &css(style))
        .replace("__TRADE__", &trade_details(input))
        .replace("__GAIN_TYPE__", result.gain_type.label())
        .replace("__SUMMARY__", &summary_list(result))
        .replace("__CHART__", &chart)
        .replace("__GUIDE__", &guide_list())
}

fn css(style: &ThemeStyle) -> String {
    format!(
        "body {{ background-color: {bg}; color: {text}; font-family: sans-serif; margin: 0; }}
main {{ max-width: 640px; margin: 0 auto; padding: 1rem; }}
.caption {{ opacity: 0.7; }}
.trade dl {{ display: grid; grid-template-columns: auto auto; gap: 0.25rem 1rem; background-color: {panel}; padding: 0.75rem; border-radius: 0.5rem; }}
.trade dd {{ margin: 0; text-align: right; }}
.success {{ background-color: {success_bg}; color: {success_text}; padding: 0.75rem; border-radius: 0.5rem; }}
.summary {{ line-height: 1.6; }}
.chart svg {{ width: 100%; height: auto; }}
details {{ background-color: {panel}; padding: 0.75rem; border-radius: 0.5rem; }}
a {{ color: {accent}; }}",
        bg = style.background,
        text = style.text,
        panel = style.panel,
        accent = style.accent,
        success_bg = style.success_background,
        success_text = style.success_text,
    )
}

fn trade_details(input: &TradeInput) -> String {
    let rows = [
        ("Buy Price per Share", format_inr(input.buy_price())),
        ("Sell Price per Share", format_inr(input.sell_price())),
        ("Buy Date", input.buy_date().format("%Y-%m-%d").to_string()),
        ("Sell Date", input.sell_date().format("%Y-%m-%d").to_string()),
    ];
    let mut out = String::from("<dl>\n");
    for (label, value) in rows {
        out.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", label, value));
    }
    out.push_str("</dl>");
    out
}

fn summary_list(result: &GainResult) -> String {
    summary_items(result)
        .into_iter()
        .map(|item| match item.emphasis {
            Emphasis::None => format!("<li>{} {}: {}</li>", item.icon, item.label, item.value),
            Emphasis::Value => format!(
                "<li>{} {}: <strong>{}</strong></li>",
                item.icon, item.label, item.value
            ),
            Emphasis::Line => format!(
                "<li>{} <strong>{}: {}</strong></li>",
                item.icon, item.label, item.value
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn guide_list() -> String {
    let mut out = String::from("<ol>\n");
    for (i, step) in guide::STEPS.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!(
                "<li>Open <a href=\"{}\">Zerodha Console</a></li>\n",
                guide::CONSOLE_URL
            ));
        } else {
            out.push_str(&format!("<li>{}</li>\n", step.replace('&', "&amp;")));
        }
    }
    out.push_str("</ol>\n");
    out.push_str(&format!("<p>{}</p>", guide::FOOTER));
    out
}

fn svg_open(style: &ThemeStyle, title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" font-size=\"12\" fill=\"{text}\">\n\
         <text x=\"{cx}\" y=\"22\" text-anchor=\"middle\" font-size=\"15\">{title}</text>\n",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        text = style.text,
        cx = CHART_WIDTH / 2.0,
        title = title,
    )
}

/// Bar chart; bars below the zero line for negative amounts
pub fn svg_bar_chart(series: &ChartSeries, style: &ThemeStyle) -> String {
    let values: Vec<f64> = series
        .points
        .iter()
        .map(|p| p.value.to_f64().unwrap_or(0.0))
        .collect();
    let mut lo = values.iter().copied().fold(0.0, f64::min);
    let mut hi = values.iter().copied().fold(0.0, f64::max);
    if hi - lo == 0.0 {
        lo = 0.0;
        hi = 1.0;
    }

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y = |v: f64| MARGIN_TOP + (hi - v) / (hi - lo) * plot_height;

    let mut svg = svg_open(style, "Gains vs Tax vs Charges");
    svg.push_str(&format!(
        "<text transform=\"translate(16 {}) rotate(-90)\" text-anchor=\"middle\">Amount (₹)</text>\n",
        MARGIN_TOP + plot_height / 2.0
    ));

    for i in 0..=4 {
        let v = lo + (hi - lo) * f64::from(i) / 4.0;
        svg.push_str(&format!(
            "<line x1=\"{x1}\" y1=\"{y:.1}\" x2=\"{x2}\" y2=\"{y:.1}\" stroke=\"{grid}\" stroke-dasharray=\"4 4\" stroke-opacity=\"0.3\"/>\
             <text x=\"{tx}\" y=\"{ty:.1}\" text-anchor=\"end\">{v:.0}</text>\n",
            x1 = MARGIN_LEFT,
            x2 = CHART_WIDTH - MARGIN_RIGHT,
            y = y(v),
            grid = style.grid,
            tx = MARGIN_LEFT - 6.0,
            ty = y(v) + 4.0,
            v = v,
        ));
    }

    let slot = plot_width / series.points.len() as f64;
    let bar_width = slot * 0.6;
    for (i, (point, value)) in series.points.iter().zip(values.iter().copied()).enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let top = y(value.max(0.0));
        let bottom = y(value.min(0.0));
        let label_y = if value < 0.0 { bottom + 14.0 } else { top - 4.0 };
        svg.push_str(&format!(
            "<rect x=\"{x:.1}\" y=\"{top:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" fill=\"{color}\"><title>{label}</title></rect>\
             <text x=\"{cx:.1}\" y=\"{ly:.1}\" text-anchor=\"middle\">{amount}</text>\
             <text x=\"{cx:.1}\" y=\"{cy:.1}\" text-anchor=\"middle\">{label}</text>\n",
            x = x,
            top = top,
            w = bar_width,
            h = bottom - top,
            color = point.color,
            label = point.label,
            cx = x + bar_width / 2.0,
            ly = label_y,
            amount = format_whole_inr(point.value),
            cy = CHART_HEIGHT - MARGIN_BOTTOM + 20.0,
        ));
    }

    svg.push_str(&format!(
        "<line x1=\"{x1}\" y1=\"{y:.1}\" x2=\"{x2}\" y2=\"{y:.1}\" stroke=\"{grid}\"/>\n",
        x1 = MARGIN_LEFT,
        x2 = CHART_WIDTH - MARGIN_RIGHT,
        y = y(0.0),
        grid = style.grid,
    ));
    svg.push_str("</svg>");
    svg
}

/// Pie chart, slices counter-clockwise from 140°. The series must be `pie_drawable`.
pub fn svg_pie_chart(series: &ChartSeries, style: &ThemeStyle) -> String {
    let cx = CHART_WIDTH / 2.0;
    let cy = (CHART_HEIGHT + MARGIN_TOP) / 2.0;
    let r = (CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / 2.0;
    let at = |angle: f64, radius: f64| {
        let rad = angle.to_radians();
        (cx + radius * rad.cos(), cy - radius * rad.sin())
    };

    let mut svg = svg_open(style, "Gains Breakdown");
    let mut angle = PIE_START_ANGLE;
    for (point, share) in series.points.iter().zip(series.shares()) {
        let sweep = share.to_f64().unwrap_or(0.0).max(0.0) * 3.6;

        // Empty slices get no arc but keep their label
        if sweep >= 359.999 {
            svg.push_str(&format!(
                "<circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{r:.1}\" fill=\"{color}\"/>\n",
                color = point.color
            ));
        } else if sweep > 0.0 {
            let (x1, y1) = at(angle, r);
            let (x2, y2) = at(angle + sweep, r);
            let large_arc = if sweep > 180.0 { 1 } else { 0 };
            svg.push_str(&format!(
                "<path d=\"M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 0 {x2:.1} {y2:.1} Z\" fill=\"{color}\"/>\n",
                color = point.color
            ));
        }

        let mid = angle + sweep / 2.0;
        let (px, py) = at(mid, r * 0.6);
        let (lx, ly) = at(mid, r * 1.12);
        let anchor = if mid.to_radians().cos() < 0.0 { "end" } else { "start" };
        svg.push_str(&format!(
            "<text x=\"{px:.1}\" y=\"{py:.1}\" text-anchor=\"middle\">{pct}</text>\
             <text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"{anchor}\">{label}</text>\n",
            pct = format_pct(share),
            label = point.label,
        ));

        angle += sweep;
    }
    svg.push_str("</svg>");
    svg
}
