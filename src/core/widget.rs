//! Converter view-model: input state, loaded rates and the last result

use std::sync::Arc;
use tracing::{debug, instrument};

use super::convert;
use super::currency::{Currency, RateTableProvider};
use super::loader::{LoadState, RateLoader};
use super::rates::RateTable;

/// Reads the longest numeric prefix of `text`: optional sign, digits with an
/// optional fraction, optional exponent, or the literal `Infinity`.
fn parse_leading_number(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let sign = if bytes[0] == b'-' { -1.0 } else { 1.0 };
        return sign * f64::INFINITY;
    }

    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

pub struct ConverterWidget {
    loader: RateLoader,
    amount: Option<f64>,
    source: Currency,
    target: Currency,
    converted: String,
}

impl ConverterWidget {
    /// Mounts the widget, starting the rate fetch in the background.
    pub fn mount(provider: Arc<dyn RateTableProvider>) -> Self {
        ConverterWidget {
            loader: RateLoader::spawn(provider),
            amount: None,
            source: Currency::USD,
            target: Currency::PKR,
            converted: "0.00".to_string(),
        }
    }

    pub async fn settled(&mut self) -> LoadState {
        self.loader.settled().await
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.loader.error()
    }

    pub fn rates(&self) -> RateTable {
        self.loader.rates()
    }

    /// Stores the amount typed by the user. Only the leading number is read,
    /// so "12abc" is 12; text with no leading number is kept as `NaN` and
    /// only matters when converting.
    pub fn set_amount(&mut self, text: &str) {
        let text = text.trim();
        self.amount = if text.is_empty() {
            None
        } else {
            Some(parse_leading_number(text))
        };
        debug!(amount = ?self.amount, "Amount updated");
    }

    pub fn set_source(&mut self, currency: Currency) {
        self.source = currency;
    }

    pub fn set_target(&mut self, currency: Currency) {
        self.target = currency;
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn source(&self) -> Currency {
        self.source
    }

    pub fn target(&self) -> Currency {
        self.target
    }

    /// Last formatted conversion result.
    pub fn converted(&self) -> &str {
        &self.converted
    }

    /// Recomputes the result from the current inputs.
    ///
    /// Does nothing until rates have loaded, and nothing for an unset, zero or
    /// malformed amount. Returns whether the result was updated.
    #[instrument(skip(self), fields(source = %self.source, target = %self.target))]
    pub fn convert(&mut self) -> bool {
        let LoadState::Ready(rates) = self.loader.state() else {
            debug!("Rates not available, skipping conversion");
            return false;
        };

        match convert::convert(self.amount, self.source, self.target, &rates) {
            Some(result) => {
                debug!(%result, "Converted");
                self.converted = result;
                true
            }
            None => {
                debug!(amount = ?self.amount, "Nothing to convert");
                false
            }
        }
    }
}
