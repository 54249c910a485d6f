use clap::{Parser, Subcommand};

mod cmd;
mod core;
mod format;

#[derive(Parser, Debug)]
#[command(
    name = "gainc",
    version,
    about = "Capital Gains Calculator (India) - STCG/LTCG on equity trades"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate gain, charges and tax for a single trade
    Calc(cmd::calc::CalcCommand),
    /// Calculate every trade in a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Render a single trade as an HTML page with a chart
    Html(cmd::html::HtmlCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// How to take trade figures from Zerodha Console
    Guide(cmd::guide::GuideCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);

    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Html(html) => html.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Guide(guide) => guide.exec(),
    }
}
