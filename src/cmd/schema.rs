//! Schema command - print expected input formats

use crate::core::{SchemaField, TradeBatch, TradeRecord};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the batch input format
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let out = match self.format {
            SchemaFormat::JsonSchema => serde_json::to_string_pretty(&schema_for!(TradeBatch))?,
            SchemaFormat::CsvHeader => csv_header(TradeRecord::schema_fields()),
            SchemaFormat::CsvFields => csv_fields(TradeRecord::schema_fields()),
        };
        println!("{}", out);
        Ok(())
    }
}

fn csv_header(fields: &[SchemaField]) -> String {
    fields.iter().map(|f| f.name).collect::<Vec<_>>().join(",")
}

fn csv_fields(fields: &[SchemaField]) -> String {
    let mut out = String::from("CSV Input Format\n================\n\n");
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        out.push_str(&format!("{:20} ({:8})  {}\n", field.name, req, field.description));
    }
    out.push_str("\nOne trade per row; each row is calculated on its own.");
    out
}
