//! Guide command - where to find the figures for a trade in Zerodha Console

use clap::Args;

pub const CONSOLE_URL: &str = "https://console.zerodha.com/";

pub const STEPS: &[&str] = &[
    "Open Zerodha Console",
    "Go to Reports → Tax P&L",
    "Download your Tax Report and input values manually here.",
];

pub const FOOTER: &str = "✅ Use this tool to preview your tax impact before filing.";

#[derive(Args, Debug)]
pub struct GuideCommand {}

impl GuideCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        print!("{}", render_text());
        Ok(())
    }
}

pub fn render_text() -> String {
    let mut out = String::from("🧾 How to Use with Zerodha\n\n");
    for (i, step) in STEPS.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{}. {} ({})\n", i + 1, step, CONSOLE_URL));
        } else {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }
    out.push_str(FOOTER);
    out.push('\n');
    out.push_str(
        "\nThen run: gainc calc --buy-price <P> --sell-price <P> --quantity-bought <N> \
         --quantity-sold <N> --buy-date <YYYY-MM-DD> --sell-date <YYYY-MM-DD>\n",
    );
    out
}
