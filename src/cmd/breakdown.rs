//! Shared rendering of a gain breakdown: summary lines, markdown and JSON shapes

use crate::core::{ChartKind, ChartSeries, GainResult};
use crate::format::{format_amount, format_inr, format_plain_inr};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// How a summary line is highlighted in markdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    None,
    Value,
    Line,
}

/// One line of the human-readable summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryItem {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub emphasis: Emphasis,
}

/// Summary lines in display order
pub fn summary_items(result: &GainResult) -> Vec<SummaryItem> {
    vec![
        item("📦", "Bought", format!("{} shares", result.quantity_bought), Emphasis::Value),
        item("📤", "Sold", format!("{} shares", result.quantity_sold), Emphasis::Value),
        item("📆", "Holding Period", format!("{} days", result.holding_days), Emphasis::Value),
        item("💰", "Gross Gain", format_inr(result.gross_gain), Emphasis::None),
        item("🔧", "Brokerage", format_plain_inr(result.brokerage), Emphasis::None),
        item(
            "📑",
            "Other Charges (STT + Exchange + SEBI)",
            format_plain_inr(result.statutory_charges),
            Emphasis::None,
        ),
        item(
            "➡️",
            "Total Gain After Charges",
            format_inr(result.total_gain_after_charges),
            Emphasis::None,
        ),
        item("📉", "Tax", format_inr(result.tax), Emphasis::None),
        item("✅", "Net Profit After Tax", format_inr(result.net_gain), Emphasis::Line),
    ]
}

fn item(icon: &'static str, label: &'static str, value: String, emphasis: Emphasis) -> SummaryItem {
    SummaryItem {
        icon,
        label,
        value,
        emphasis,
    }
}

/// Markdown summary: gain type, then one bullet per summary line
pub fn render_markdown(result: &GainResult) -> String {
    let mut out = format!("✅ {}\n\n", result.gain_type);
    for item in summary_items(result) {
        let line = match item.emphasis {
            Emphasis::None => format!("- {} {}: {}", item.icon, item.label, item.value),
            Emphasis::Value => format!("- {} {}: **{}**", item.icon, item.label, item.value),
            Emphasis::Line => format!("- {} **{}: {}**", item.icon, item.label, item.value),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    label: &'static str,
    #[tabled(rename = "Amount")]
    value: String,
}

/// Key/value table of the summary lines
pub fn render_table(result: &GainResult) -> String {
    let rows: Vec<SummaryRow> = summary_items(result)
        .into_iter()
        .map(|item| SummaryRow {
            label: item.label,
            value: item.value,
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Breakdown for JSON output
#[derive(Debug, Serialize)]
pub struct BreakdownData {
    pub gain_type: String,
    pub gain_code: String,
    pub quantity_bought: u64,
    pub quantity_sold: u64,
    pub holding_days: i64,
    pub gross_gain: String,
    pub brokerage: String,
    pub stt: String,
    pub exchange_fee: String,
    pub sebi_fee: String,
    pub other_charges: String,
    pub total_gain_after_charges: String,
    pub taxable_gain: String,
    pub tax: String,
    pub net_gain: String,
    pub chart: ChartData,
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    /// Chart actually drawn (pie may fall back to bar)
    pub kind: ChartKind,
    pub series: Vec<ChartValue>,
}

#[derive(Debug, Serialize)]
pub struct ChartValue {
    pub label: String,
    pub value: String,
}

impl BreakdownData {
    pub fn new(result: &GainResult, requested_chart: ChartKind) -> Self {
        let series = ChartSeries::from(result);
        BreakdownData {
            gain_type: result.gain_type.label().to_string(),
            gain_code: result.gain_type.code().to_string(),
            quantity_bought: result.quantity_bought,
            quantity_sold: result.quantity_sold,
            holding_days: result.holding_days,
            gross_gain: format_amount(result.gross_gain),
            brokerage: format_amount(result.brokerage),
            stt: format_amount(result.charges.stt),
            exchange_fee: format_amount(result.charges.exchange_fee),
            sebi_fee: format_amount(result.charges.sebi_fee),
            other_charges: format_amount(result.statutory_charges),
            total_gain_after_charges: format_amount(result.total_gain_after_charges),
            taxable_gain: format_amount(result.taxable_gain),
            tax: format_amount(result.tax),
            net_gain: format_amount(result.net_gain),
            chart: ChartData {
                kind: series.resolve(requested_chart),
                series: series
                    .points
                    .iter()
                    .map(|p| ChartValue {
                        label: p.label.to_string(),
                        value: format_amount(p.value),
                    })
                    .collect(),
            },
        }
    }
}
