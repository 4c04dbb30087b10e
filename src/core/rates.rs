//! USD based exchange rate table

use chrono::NaiveDate;
use std::collections::HashMap;

use super::currency::Currency;

/// Units of each currency per 1 USD, as published by a rate provider.
///
/// Entries are keyed by currency code and may be missing for any of the
/// selectable currencies. The provider's base code and as-of date are kept
/// for display only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    base: Option<String>,
    date: Option<NaiveDate>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        RateTable {
            rates,
            base: None,
            date: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate for a selectable currency, `NaN` when the table has no entry.
    pub fn rate_for(&self, currency: Currency) -> f64 {
        self.get(currency.code()).unwrap_or(f64::NAN)
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        RateTable::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
