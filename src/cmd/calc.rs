//! Calc command - gain and tax breakdown for a single trade

use super::breakdown::{render_markdown, render_table, BreakdownData};
use super::{evaluate_or_exit, TradeArgs};
use crate::core::{ChartKind, ChartSeries};
use crate::format::{format_pct, format_whole_inr};
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Width of the longest bar in the text chart
const BAR_WIDTH: usize = 40;

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    trade: TradeArgs,

    /// Output as markdown instead of a formatted table
    #[arg(long, conflicts_with = "json")]
    markdown: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (input, result) = evaluate_or_exit(self.trade.to_record());

        if self.json {
            let data = BreakdownData::new(&result, input.chart());
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else if self.markdown {
            print!("{}", render_markdown(&result));
        } else {
            let series = ChartSeries::from(&result);
            println!();
            println!("✅ {}", result.gain_type);
            println!("{}", render_table(&result));
            println!();
            print!("{}", render_text_chart(&series, series.resolve(input.chart())));
        }
        Ok(())
    }
}

/// Draw the series as a terminal chart.
///
/// Bars are scaled to the largest absolute value; negative values extend to
/// the left of the axis. Pie charts are drawn as percentage shares.
pub fn render_text_chart(series: &ChartSeries, kind: ChartKind) -> String {
    let mut out = String::new();
    match kind {
        ChartKind::Bar => {
            out.push_str("Gains vs Tax vs Charges\n");
            let max = series.max_abs();
            let has_negative = series.points.iter().any(|p| p.value < Decimal::ZERO);
            for point in &series.points {
                let len = scaled(point.value.abs(), max, BAR_WIDTH);
                let (left, right) = if point.value < Decimal::ZERO {
                    (format!("{:>width$}", "█".repeat(len), width = BAR_WIDTH), String::new())
                } else if has_negative {
                    (" ".repeat(BAR_WIDTH), "█".repeat(len))
                } else {
                    (String::new(), "█".repeat(len))
                };
                out.push_str(&format!(
                    "  {:<14}{}│{} {}\n",
                    point.label,
                    left,
                    right,
                    format_whole_inr(point.value)
                ));
            }
        }
        ChartKind::Pie => {
            out.push_str("Gains Breakdown\n");
            for (point, share) in series.points.iter().zip(series.shares()) {
                out.push_str(&format!(
                    "  {:<14}{:>7}  {}\n",
                    point.label,
                    format_pct(share),
                    "█".repeat(scaled(share, Decimal::ONE_HUNDRED, BAR_WIDTH))
                ));
            }
        }
    }
    out
}

fn scaled(value: Decimal, max: Decimal, width: usize) -> usize {
    if max.is_zero() {
        return 0;
    }
    (value / max * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GainResult, GainType, StatutoryCharges};
    use rust_decimal_macros::dec;

    fn series(net: Decimal, tax: Decimal, brokerage: Decimal, charges: Decimal) -> ChartSeries {
        ChartSeries::from(&GainResult {
            quantity_bought: 10,
            quantity_sold: 10,
            holding_days: 100,
            gross_gain: Decimal::ZERO,
            brokerage,
            charges: StatutoryCharges {
                stt: charges,
                exchange_fee: Decimal::ZERO,
                sebi_fee: Decimal::ZERO,
            },
            statutory_charges: charges,
            total_gain_after_charges: Decimal::ZERO,
            gain_type: GainType::ShortTerm,
            taxable_gain: Decimal::ZERO,
            tax,
            net_gain: net,
        })
    }

    #[test]
    fn bar_chart_scales_to_largest_value() {
        let chart = render_text_chart(&series(dec!(400), dec!(100), dec!(20), dec!(0)), ChartKind::Bar);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[0], "Gains vs Tax vs Charges");
        assert_eq!(lines[1], format!("  {:<14}│{} ₹400", "Net Profit", "█".repeat(40)));
        assert_eq!(lines[2], format!("  {:<14}│{} ₹100", "Tax", "█".repeat(10)));
        assert_eq!(lines[4], format!("  {:<14}│ ₹0", "Other Charges"));
    }

    #[test]
    fn bar_chart_draws_negative_values_left_of_axis() {
        let chart = render_text_chart(&series(dec!(-400), dec!(-100), dec!(20), dec!(1)), ChartKind::Bar);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[1], format!("  {:<14}{}│ ₹-400", "Net Profit", "█".repeat(40)));
        assert_eq!(
            lines[3],
            format!("  {:<14}{}│{} ₹20", "Brokerage", " ".repeat(40), "█".repeat(2))
        );
    }

    #[test]
    fn pie_chart_shows_shares() {
        let chart = render_text_chart(&series(dec!(60), dec!(20), dec!(10), dec!(10)), ChartKind::Pie);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[0], "Gains Breakdown");
        assert!(lines[1].contains("60.0%"));
        assert!(lines[2].contains("20.0%"));
        assert!(lines[1].ends_with(&"█".repeat(24)));
    }

    #[test]
    fn pie_chart_for_very_large_gain() {
        use crate::cmd::evaluate;
        use crate::core::trade::tests::{date, record};
        use crate::core::TradeRecord;

        let (input, result) = evaluate(TradeRecord {
            buy_date: date("2020-01-01"),
            sell_date: date("2023-01-01"),
            chart: Some(ChartKind::Pie),
            ..record(dec!(0), dec!(1000000000000000000000000000), 1, 1)
        })
        .unwrap();
        let series = ChartSeries::from(&result);
        assert_eq!(series.resolve(input.chart()), ChartKind::Pie);

        let chart = render_text_chart(&series, ChartKind::Pie);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[0], "Gains Breakdown");
        assert!(lines[1].contains("89.9%"));
        assert!(lines[2].contains("10.0%"));
    }
}
