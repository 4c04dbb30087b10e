pub mod cli;
pub mod core;
pub mod providers;

use crate::core::Currency;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Interactive,
    Convert {
        amount: String,
        from: Option<Currency>,
        to: Option<Currency>,
    },
    Rates {
        to: Option<Currency>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(providers::ExchangeRateApiProvider::new(
        &config.provider.base_url,
    ));

    match command {
        AppCommand::Interactive => cli::interactive::run(provider, &config.defaults).await,
        AppCommand::Convert { amount, from, to } => {
            let source = from.unwrap_or(config.defaults.source);
            let target = to.unwrap_or(config.defaults.target);
            cli::convert::run(provider, &amount, source, target)
                .await
                .map(|_| ())
        }
        AppCommand::Rates { to } => {
            cli::rates::run(provider, to.unwrap_or(config.defaults.target)).await
        }
    }
}
