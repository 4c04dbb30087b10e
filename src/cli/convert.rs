use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::ui;
use crate::core::{ConverterWidget, Currency, RateTableProvider};

/// Runs a single conversion and prints the resulting card.
pub async fn run(
    provider: Arc<dyn RateTableProvider>,
    amount: &str,
    source: Currency,
    target: Currency,
) -> Result<String> {
    let mut widget = ConverterWidget::mount(provider);
    widget.set_source(source);
    widget.set_target(target);

    let pb = ui::new_spinner("Loading exchange rates...");
    widget.settled().await;
    pb.finish_and_clear();

    widget.set_amount(amount);
    if widget.convert() {
        info!(
            amount,
            %source,
            %target,
            result = widget.converted(),
            "Conversion complete"
        );
    }

    let card = widget.display_as_card();
    println!("{card}");
    Ok(widget.converted().to_string())
}
