pub mod batch;
pub mod breakdown;
pub mod calc;
pub mod guide;
pub mod html;
pub mod schema;

use crate::core::trade;
use crate::core::{
    calculate_gain, ChartKind, GainError, GainResult, ParsedTrade, TradeInput, TradeRecord,
    GENERIC_ERROR_MESSAGE,
};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Trade details entered on the command line
#[derive(Args, Debug, Clone)]
pub struct TradeArgs {
    /// Buy price per share (₹)
    #[arg(long, allow_hyphen_values = true)]
    buy_price: Decimal,

    /// Sell price per share (₹)
    #[arg(long, allow_hyphen_values = true)]
    sell_price: Decimal,

    /// Total shares bought
    #[arg(long)]
    quantity_bought: u64,

    /// Shares sold (at most the shares bought)
    #[arg(long)]
    quantity_sold: u64,

    /// Brokerage for the trade (₹)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    brokerage: Decimal,

    /// Buy date (YYYY-MM-DD)
    #[arg(long)]
    buy_date: NaiveDate,

    /// Sell date (YYYY-MM-DD)
    #[arg(long)]
    sell_date: NaiveDate,

    /// Chart type
    #[arg(long, value_enum, default_value_t = ChartArg::Bar)]
    chart: ChartArg,
}

impl TradeArgs {
    pub fn to_record(&self) -> TradeRecord {
        TradeRecord {
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            quantity_bought: self.quantity_bought,
            quantity_sold: self.quantity_sold,
            brokerage: Some(self.brokerage),
            buy_date: self.buy_date,
            sell_date: self.sell_date,
            chart: Some(self.chart.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ChartArg {
    #[default]
    Bar,
    Pie,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Pie => ChartKind::Pie,
        }
    }
}

/// Validate a trade as entered and run the calculation.
pub fn evaluate(record: TradeRecord) -> Result<(TradeInput, GainResult), GainError> {
    let input = TradeInput::try_from(record)?;
    let result = calculate_gain(&input)?;
    Ok((input, result))
}

/// Validate and calculate, or tell the user it failed and exit.
/// The cause is only logged; the user sees the same message for any failure.
pub fn evaluate_or_exit(record: TradeRecord) -> (TradeInput, GainResult) {
    match evaluate(record) {
        Ok(evaluated) => evaluated,
        Err(err) => {
            log::debug!("Calculation rejected: {}", err);
            eprintln!("{}", GENERIC_ERROR_MESSAGE);
            std::process::exit(1);
        }
    }
}

/// Read trades (CSV or JSON) from a file, or from stdin with "-"
pub fn read_trades(path: &Path) -> anyhow::Result<Vec<ParsedTrade>> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<Vec<ParsedTrade>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(trade::read_json(reader)?),
        // Default to CSV for .csv files and any other extension
        _ => Ok(trade::read_csv(reader)),
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<ParsedTrade>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.iter().all(u8::is_ascii_whitespace) {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let is_json = buffer
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');

    let cursor = io::Cursor::new(buffer);
    if is_json {
        Ok(trade::read_json(cursor)?)
    } else {
        Ok(trade::read_csv(cursor))
    }
}
