use anyhow::Result;
use comfy_table::Cell;
use std::sync::Arc;

use super::ui;
use crate::core::convert::conversion_rate;
use crate::core::{Currency, FETCH_ERROR_MESSAGE, LoadState, RateLoader, RateTable, RateTableProvider};

/// Lists the selectable currencies with their USD rate and the cross rate
/// into `target`.
pub fn display_rates_table(rates: &RateTable, target: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Per 1 USD"),
        ui::header_cell(&format!("1 unit in {target}")),
    ]);

    for currency in Currency::all() {
        let per_usd = rates.get(currency.code());
        let cross = Some(conversion_rate(rates, currency, target)).filter(|r| r.is_finite());
        table.add_row(vec![
            Cell::new(format!("{} {}", currency, currency.symbol())),
            Cell::new(currency.name()),
            ui::format_optional_cell(per_usd, |r| format!("{r:.4}")),
            ui::format_optional_cell(cross, |r| format!("{r:.4}")),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Exchange Rates", ui::StyleType::Accent)
    );
    output.push_str(&table.to_string());
    if let Some(date) = rates.date() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(&format!("Rates as of {date}"), ui::StyleType::Subtle)
        ));
    }
    output
}

pub async fn run(provider: Arc<dyn RateTableProvider>, target: Currency) -> Result<()> {
    let mut loader = RateLoader::spawn(provider);

    let pb = ui::new_spinner("Loading exchange rates...");
    let state = loader.settled().await;
    pb.finish_and_clear();

    if let LoadState::Ready(rates) = state {
        println!("{}", display_rates_table(&rates, target));
    } else {
        println!("{}", ui::style_text(FETCH_ERROR_MESSAGE, ui::StyleType::Error));
    }
    Ok(())
}
