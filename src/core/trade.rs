use super::error::InputError;
use chrono::NaiveDate;
use gainc_derive::SchemaFields;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Description of one input field, generated by `#[derive(SchemaFields)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Chart drawn alongside the breakdown. Only presentation reads this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
}

/// JSON input root
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TradeBatch {
    pub trades: Vec<TradeRecord>,
}

/// A trade as entered, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, SchemaFields)]
pub struct TradeRecord {
    /// Buy price per share (₹)
    #[schemars(with = "f64")]
    pub buy_price: Decimal,
    /// Sell price per share (₹)
    #[schemars(with = "f64")]
    pub sell_price: Decimal,
    /// Total shares bought in the lot
    pub quantity_bought: u64,
    /// Shares sold, at most quantity_bought
    pub quantity_sold: u64,
    /// Flat brokerage for the trade (₹), defaults to 0
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub brokerage: Option<Decimal>,
    /// Buy date (YYYY-MM-DD)
    pub buy_date: NaiveDate,
    /// Sell date (YYYY-MM-DD)
    pub sell_date: NaiveDate,
    /// Chart type: bar or pie, defaults to bar
    #[serde(default)]
    pub chart: Option<ChartKind>,
}

/// A validated trade: one buy lot and one (partial or full) sale from it.
///
/// The only way to build one is `TradeInput::try_from(TradeRecord)`, so every
/// instance has non-negative prices and brokerage and
/// `1 <= quantity_sold <= quantity_bought`. The order of the two dates is not
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeInput {
    buy_price: Decimal,
    sell_price: Decimal,
    quantity_bought: u64,
    quantity_sold: u64,
    brokerage: Decimal,
    buy_date: NaiveDate,
    sell_date: NaiveDate,
    chart: ChartKind,
}

impl TradeInput {
    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    pub fn quantity_bought(&self) -> u64 {
        self.quantity_bought
    }

    pub fn quantity_sold(&self) -> u64 {
        self.quantity_sold
    }

    pub fn brokerage(&self) -> Decimal {
        self.brokerage
    }

    pub fn buy_date(&self) -> NaiveDate {
        self.buy_date
    }

    pub fn sell_date(&self) -> NaiveDate {
        self.sell_date
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }
}

impl TryFrom<TradeRecord> for TradeInput {
    type Error = InputError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let brokerage = record.brokerage.unwrap_or(Decimal::ZERO);

        non_negative("buy_price", record.buy_price)?;
        non_negative("sell_price", record.sell_price)?;
        if record.quantity_bought == 0 {
            return Err(InputError::ZeroQuantity("quantity_bought"));
        }
        if record.quantity_sold == 0 {
            return Err(InputError::ZeroQuantity("quantity_sold"));
        }
        if record.quantity_sold > record.quantity_bought {
            return Err(InputError::SoldExceedsBought {
                sold: record.quantity_sold,
                bought: record.quantity_bought,
            });
        }
        non_negative("brokerage", brokerage)?;

        Ok(TradeInput {
            buy_price: record.buy_price,
            sell_price: record.sell_price,
            quantity_bought: record.quantity_bought,
            quantity_sold: record.quantity_sold,
            brokerage,
            buy_date: record.buy_date,
            sell_date: record.sell_date,
            chart: record.chart.unwrap_or_default(),
        })
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), InputError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(InputError::Negative {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Result of parsing one trade from a file; a bad row does not affect the others.
pub type ParsedTrade = Result<TradeRecord, InputError>;

/// Read trades from CSV (header row required, one trade per row)
pub fn read_csv<R: Read>(reader: R) -> Vec<ParsedTrade> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<TradeRecord>()
        .map(|row| row.map_err(|e| InputError::Malformed(e.to_string())))
        .collect()
}

/// Read trades from a JSON document of the form `{"trades": [...]}`
pub fn read_json<R: Read>(reader: R) -> Result<Vec<ParsedTrade>, InputError> {
    #[derive(Deserialize)]
    struct RawBatch {
        trades: Vec<serde_json::Value>,
    }

    let batch: RawBatch =
        serde_json::from_reader(reader).map_err(|e| InputError::Malformed(e.to_string()))?;

    Ok(batch
        .trades
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .map_err(|e| InputError::Malformed(format!("trade {}: {}", i + 1, e)))
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub(crate) fn record(buy: Decimal, sell: Decimal, bought: u64, sold: u64) -> TradeRecord {
        TradeRecord {
            buy_price: buy,
            sell_price: sell,
            quantity_bought: bought,
            quantity_sold: sold,
            brokerage: None,
            buy_date: date("2023-01-01"),
            sell_date: date("2024-06-01"),
            chart: None,
        }
    }

    #[test]
    fn valid_record_applies_defaults() {
        let input = TradeInput::try_from(record(dec!(100), dec!(150), 10, 4)).unwrap();
        assert_eq!(input.brokerage(), Decimal::ZERO);
        assert_eq!(input.chart(), ChartKind::Bar);
        assert_eq!(input.quantity_sold(), 4);
    }

    #[test]
    fn zero_prices_are_allowed() {
        assert!(TradeInput::try_from(record(dec!(0), dec!(0), 1, 1)).is_ok());
    }

    #[test]
    fn rejects_negative_prices() {
        let err = TradeInput::try_from(record(dec!(-1), dec!(150), 10, 10)).unwrap_err();
        assert_eq!(
            err,
            InputError::Negative {
                field: "buy_price",
                value: "-1".to_string()
            }
        );

        let err = TradeInput::try_from(record(dec!(1), dec!(-0.5), 10, 10)).unwrap_err();
        assert!(matches!(err, InputError::Negative { field: "sell_price", .. }));
    }

    #[test]
    fn rejects_negative_brokerage() {
        let mut rec = record(dec!(100), dec!(150), 10, 10);
        rec.brokerage = Some(dec!(-20));
        let err = TradeInput::try_from(rec).unwrap_err();
        assert!(matches!(err, InputError::Negative { field: "brokerage", .. }));
    }

    #[test]
    fn rejects_zero_quantities() {
        assert_eq!(
            TradeInput::try_from(record(dec!(1), dec!(2), 0, 0)).unwrap_err(),
            InputError::ZeroQuantity("quantity_bought")
        );
        assert_eq!(
            TradeInput::try_from(record(dec!(1), dec!(2), 5, 0)).unwrap_err(),
            InputError::ZeroQuantity("quantity_sold")
        );
    }

    #[test]
    fn rejects_selling_more_than_bought() {
        assert_eq!(
            TradeInput::try_from(record(dec!(1), dec!(2), 5, 6)).unwrap_err(),
            InputError::SoldExceedsBought { sold: 6, bought: 5 }
        );
    }

    #[test]
    fn inverted_dates_are_accepted() {
        let mut rec = record(dec!(100), dec!(150), 10, 10);
        rec.buy_date = date("2024-06-01");
        rec.sell_date = date("2024-01-01");
        assert!(TradeInput::try_from(rec).is_ok());
    }

    #[test]
    fn csv_rows_parse_independently() {
        let data = "\
buy_price,sell_price,quantity_bought,quantity_sold,brokerage,buy_date,sell_date,chart
100,150,10,10,20,2023-01-01,2024-02-05,pie
abc,150,10,10,20,2023-01-01,2024-02-05,bar
100,150,10,5,,2023-01-01,2023-06-01,
";
        let rows = read_csv(data.as_bytes());
        assert_eq!(rows.len(), 3);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.brokerage, Some(dec!(20)));
        assert_eq!(first.chart, Some(ChartKind::Pie));

        assert!(matches!(rows[1], Err(InputError::Malformed(_))));

        let third = rows[2].as_ref().unwrap();
        assert_eq!(third.brokerage, None);
        assert_eq!(third.chart, None);
        assert_eq!(third.quantity_sold, 5);
    }

    #[test]
    fn json_trades_parse_independently() {
        let data = r#"{"trades": [
            {"buy_price": 100, "sell_price": 150.5, "quantity_bought": 10,
             "quantity_sold": 10, "buy_date": "2023-01-01", "sell_date": "2024-02-05"},
            {"buy_price": "x", "sell_price": 150, "quantity_bought": 10,
             "quantity_sold": 10, "buy_date": "2023-01-01", "sell_date": "2024-02-05"}
        ]}"#;
        let rows = read_json(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().sell_price, dec!(150.5));
        assert!(matches!(&rows[1], Err(InputError::Malformed(msg)) if msg.starts_with("trade 2")));
    }

    #[test]
    fn json_without_trades_is_malformed() {
        assert!(matches!(
            read_json(r#"{"foo": 1}"#.as_bytes()),
            Err(InputError::Malformed(_))
        ));
    }

    #[test]
    fn schema_fields_from_docs() {
        let fields = TradeRecord::schema_fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "buy_price",
                "sell_price",
                "quantity_bought",
                "quantity_sold",
                "brokerage",
                "buy_date",
                "sell_date",
                "chart"
            ]
        );
        assert!(fields[0].required);
        assert_eq!(fields[0].description, "Buy price per share (₹)");
        assert!(!fields[4].required);
        assert!(!fields[7].required);
    }
}
