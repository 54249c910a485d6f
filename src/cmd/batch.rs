//! Batch command - independent calculations for every trade in a file

use super::breakdown::BreakdownData;
use super::{evaluate, read_trades};
use crate::core::{GainError, GainResult, ParsedTrade, TradeInput, GENERIC_ERROR_MESSAGE};
use crate::format::format_inr;
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Trades file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// Outcome for one input row
struct Outcome {
    row_num: usize,
    evaluated: Option<(TradeInput, GainResult)>,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let trades = read_trades(&self.file)?;
        let outcomes = evaluate_all(trades);

        if self.json {
            self.print_json(&outcomes)
        } else if self.csv {
            self.write_csv(&outcomes)
        } else {
            self.print_table(&outcomes);
            Ok(())
        }
    }

    fn print_table(&self, outcomes: &[Outcome]) {
        if outcomes.is_empty() {
            println!("No trades found");
            return;
        }

        let rows: Vec<BatchRow> = outcomes.iter().map(BatchRow::from).collect();
        let failed = rows.iter().filter(|row| row.gain_type == "Error").count();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        if failed > 0 {
            println!();
            println!("{} trade(s) failed: {}", failed, GENERIC_ERROR_MESSAGE);
        }
    }

    fn write_csv(&self, outcomes: &[Outcome]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for outcome in outcomes {
            wtr.serialize(CsvRow::from(outcome))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn print_json(&self, outcomes: &[Outcome]) -> anyhow::Result<()> {
        let output: Vec<JsonRow> = outcomes
            .iter()
            .map(|o| JsonRow {
                row_num: o.row_num,
                result: o
                    .evaluated
                    .as_ref()
                    .map(|(input, result)| BreakdownData::new(result, input.chart())),
                error: o.evaluated.is_none().then(|| GENERIC_ERROR_MESSAGE.to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn evaluate_all(trades: Vec<ParsedTrade>) -> Vec<Outcome> {
    trades
        .into_iter()
        .enumerate()
        .map(|(i, parsed)| {
            let row_num = i + 1;
            let evaluated = parsed
                .map_err(GainError::from)
                .and_then(evaluate)
                .map_err(|err| log::warn!("Trade {} rejected: {}", row_num, err))
                .ok();
            Outcome { row_num, evaluated }
        })
        .collect()
}

/// Row for the batch table output
#[derive(Debug, Clone, Tabled)]
struct BatchRow {
    #[tabled(rename = "#")]
    row_num: usize,
    #[tabled(rename = "Buy Date")]
    buy_date: String,
    #[tabled(rename = "Sell Date")]
    sell_date: String,
    #[tabled(rename = "Sold")]
    quantity_sold: String,
    #[tabled(rename = "Days")]
    holding_days: String,
    #[tabled(rename = "Type")]
    gain_type: String,
    #[tabled(rename = "Gross Gain")]
    gross_gain: String,
    #[tabled(rename = "Charges")]
    charges: String,
    #[tabled(rename = "After Charges")]
    total_gain_after_charges: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Net Profit")]
    net_gain: String,
}

impl From<&Outcome> for BatchRow {
    fn from(outcome: &Outcome) -> Self {
        let evaluated = outcome.evaluated.as_ref().and_then(|(input, result)| {
            let charges = result.brokerage.checked_add(result.statutory_charges);
            if charges.is_none() {
                log::warn!("Trade {} charges out of range", outcome.row_num);
            }
            charges.map(|charges| (input, result, charges))
        });

        match evaluated {
            Some((input, result, charges)) => BatchRow {
                row_num: outcome.row_num,
                buy_date: input.buy_date().format("%Y-%m-%d").to_string(),
                sell_date: input.sell_date().format("%Y-%m-%d").to_string(),
                quantity_sold: result.quantity_sold.to_string(),
                holding_days: result.holding_days.to_string(),
                gain_type: result.gain_type.code().to_string(),
                gross_gain: format_inr(result.gross_gain),
                charges: format_inr(charges),
                total_gain_after_charges: format_inr(result.total_gain_after_charges),
                tax: format_inr(result.tax),
                net_gain: format_inr(result.net_gain),
            },
            None => {
                let dash = || "-".to_string();
                BatchRow {
                    row_num: outcome.row_num,
                    buy_date: dash(),
                    sell_date: dash(),
                    quantity_sold: dash(),
                    holding_days: dash(),
                    gain_type: "Error".to_string(),
                    gross_gain: dash(),
                    charges: dash(),
                    total_gain_after_charges: dash(),
                    tax: dash(),
                    net_gain: dash(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow {
    row_num: usize,
    gain_type: String,
    holding_days: Option<i64>,
    gross_gain: String,
    brokerage: String,
    other_charges: String,
    total_gain_after_charges: String,
    tax: String,
    net_gain: String,
    error: String,
}

impl From<&Outcome> for CsvRow {
    fn from(outcome: &Outcome) -> Self {
        match &outcome.evaluated {
            Some((input, result)) => {
                let data = BreakdownData::new(result, input.chart());
                CsvRow {
                    row_num: outcome.row_num,
                    gain_type: data.gain_code,
                    holding_days: Some(data.holding_days),
                    gross_gain: data.gross_gain,
                    brokerage: data.brokerage,
                    other_charges: data.other_charges,
                    total_gain_after_charges: data.total_gain_after_charges,
                    tax: data.tax,
                    net_gain: data.net_gain,
                    error: String::new(),
                }
            }
            None => CsvRow {
                row_num: outcome.row_num,
                gain_type: String::new(),
                holding_days: None,
                gross_gain: String::new(),
                brokerage: String::new(),
                other_charges: String::new(),
                total_gain_after_charges: String::new(),
                tax: String::new(),
                net_gain: String::new(),
                error: GENERIC_ERROR_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRow {
    row_num: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<BreakdownData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}
