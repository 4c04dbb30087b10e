use anyhow::{Context, Result, anyhow, bail};
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use super::ui;
use crate::core::config::DefaultsConfig;
use crate::core::{ConverterWidget, Currency, RateTableProvider};

const HELP: &str = "\
Commands:
  amount <n>     set the amount to convert
  from <CODE>    select the source currency
  to <CODE>      select the target currency
  convert        convert with the current selection
  show           redraw the converter
  currencies     list the available currencies
  help           show this help
  quit           leave the converter";

/// A line typed at the converter prompt.
#[derive(Debug, PartialEq)]
pub enum Command {
    Amount(String),
    From(Currency),
    To(Currency),
    Convert,
    Show,
    Currencies,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "amount" | "a" => Command::Amount(rest.to_string()),
            "from" => Command::From(parse_currency(rest)?),
            "to" => Command::To(parse_currency(rest)?),
            "convert" | "c" => Command::Convert,
            "show" | "s" => Command::Show,
            "currencies" | "list" => Command::Currencies,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => bail!("Empty command"),
            other => bail!("Unknown command: {other}"),
        };
        Ok(command)
    }
}

fn parse_currency(code: &str) -> Result<Currency> {
    if code.is_empty() {
        bail!("Missing currency code");
    }
    Currency::from_str(code).map_err(|_| {
        let codes: Vec<&str> = Currency::all().map(|c| c.code()).collect();
        anyhow!("Unknown currency: {code} (expected one of {})", codes.join(", "))
    })
}

/// Mounts the converter, waits for rates and then serves commands from stdin.
pub async fn run(provider: Arc<dyn RateTableProvider>, defaults: &DefaultsConfig) -> Result<()> {
    let mut widget = ConverterWidget::mount(provider);
    widget.set_source(defaults.source);
    widget.set_target(defaults.target);

    let pb = ui::new_spinner("Loading exchange rates...");
    widget.settled().await;
    pb.finish_and_clear();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_session(&mut widget, stdin.lock(), &mut stdout)
}

/// Reads commands line by line until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    widget: &mut ConverterWidget,
    input: R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "{}\n", widget.display_as_card())?;
    if widget.error().is_none() {
        writeln!(output, "{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle))?;
    }

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Received command");

        match command {
            Command::Quit => break,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Currencies => {
                for currency in Currency::all() {
                    writeln!(
                        output,
                        "  {} {} {}",
                        currency,
                        currency.symbol(),
                        ui::style_text(currency.name(), ui::StyleType::Label)
                    )?;
                }
            }
            Command::Show => writeln!(output, "{}\n", widget.display_as_card())?,
            Command::Amount(text) => {
                widget.set_amount(&text);
                writeln!(output, "Amount set to {}", text.trim())?;
            }
            Command::From(currency) => {
                widget.set_source(currency);
                writeln!(output, "From {}", currency)?;
            }
            Command::To(currency) => {
                widget.set_target(currency);
                writeln!(output, "To {}", currency)?;
            }
            Command::Convert => {
                widget.convert();
                writeln!(output, "{}\n", widget.display_as_card())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use async_trait::async_trait;
    use std::io::Cursor;

    struct StaticProvider(RateTable);

    #[async_trait]
    impl RateTableProvider for StaticProvider {
        async fn fetch_rates(&self) -> Result<RateTable> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl RateTableProvider for FailingProvider {
        async fn fetch_rates(&self) -> Result<RateTable> {
            Err(anyhow!("dns error"))
        }
    }

    async fn loaded_widget() -> ConverterWidget {
        let table: RateTable = [("USD", 1.0), ("EUR", 0.92), ("GBP", 0.78), ("PKR", 278.5)]
            .into_iter()
            .collect();
        let mut widget = ConverterWidget::mount(Arc::new(StaticProvider(table)));
        widget.settled().await;
        widget
    }

    fn run_script(widget: &mut ConverterWidget, script: &str) -> String {
        console::set_colors_enabled(false);
        let mut output = Vec::new();
        run_session(widget, Cursor::new(script), &mut output).expect("session failed");
        String::from_utf8(output).expect("utf8 output")
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "amount 12.5".parse::<Command>().unwrap(),
            Command::Amount("12.5".to_string())
        );
        assert_eq!("amount".parse::<Command>().unwrap(), Command::Amount(String::new()));
        assert_eq!("FROM eur".parse::<Command>().unwrap(), Command::From(Currency::EUR));
        assert_eq!("to  gbp ".parse::<Command>().unwrap(), Command::To(Currency::GBP));
        assert_eq!("convert".parse::<Command>().unwrap(), Command::Convert);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let err = "to INR".parse::<Command>().unwrap_err().to_string();
        assert!(err.contains("Unknown currency: INR"));
        assert!(err.contains("USD, EUR, GBP, JPY, AUD, CAD, PKR"));
        assert!("from".parse::<Command>().is_err());
        assert!("swap".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_session_converts_cross_rate() {
        let mut widget = loaded_widget().await;
        let output = run_script(&mut widget, "amount 50\nfrom EUR\nto GBP\nconvert\nquit\n");

        assert!(output.contains("42.39 GBP"));
        assert_eq!(widget.converted(), "42.39");
    }

    #[tokio::test]
    async fn test_session_zero_amount_keeps_result() {
        let mut widget = loaded_widget().await;
        let output = run_script(&mut widget, "amount 100\nconvert\namount 0\nconvert\n");

        assert_eq!(widget.converted(), "27850.00");
        assert_eq!(output.matches("27850.00 PKR").count(), 2);
    }

    #[tokio::test]
    async fn test_session_reports_unknown_input_and_continues() {
        let mut widget = loaded_widget().await;
        let output = run_script(&mut widget, "to XYZ\nbogus\namount 1\nconvert\n");

        assert!(output.contains("Unknown currency: XYZ"));
        assert!(output.contains("Unknown command: bogus"));
        assert_eq!(widget.target(), Currency::PKR);
        assert_eq!(widget.converted(), "278.50");
    }

    #[tokio::test]
    async fn test_session_after_fetch_failure() {
        let mut widget = ConverterWidget::mount(Arc::new(FailingProvider));
        widget.settled().await;
        let output = run_script(&mut widget, "amount 100\nconvert\n");

        assert!(output.contains("Error fetching exchange rates."));
        assert_eq!(widget.converted(), "0.00");
    }
}
