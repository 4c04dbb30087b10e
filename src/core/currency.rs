//! Currency selection and rate table abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::rates::RateTable;

/// Currencies offered by the converter pickers.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    #[default]
    USD, // United States Dollar
    EUR, // Euro
    GBP, // Great British Pound
    JPY, // Japanese Yen
    AUD, // Australian Dollar
    CAD, // Canadian Dollar
    PKR, // Pakistani Rupee
}

impl Currency {
    /// Returns the ISO 4217 code, e.g. "USD".
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::USD => "United States Dollar",
            Self::EUR => "Euro",
            Self::GBP => "Great British Pound",
            Self::JPY => "Japanese Yen",
            Self::AUD => "Australian Dollar",
            Self::CAD => "Canadian Dollar",
            Self::PKR => "Pakistani Rupee",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::AUD | Self::CAD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
            Self::PKR => "₨",
        }
    }

    /// Every selectable currency, in picker order.
    pub fn all() -> impl Iterator<Item = Currency> {
        <Currency as strum::IntoEnumIterator>::iter()
    }
}

/// Source of a USD based rate table.
#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_parsing_is_case_insensitive() {
        assert_eq!(Currency::from_str("pkr").unwrap(), Currency::PKR);
        assert_eq!(Currency::from_str("Eur").unwrap(), Currency::EUR);
        assert!(Currency::from_str("INR").is_err());
    }

    #[test]
    fn test_currency_picker_order() {
        let codes: Vec<&str> = Currency::all().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "PKR"]);
        assert_eq!(Currency::JPY.to_string(), "JPY");
    }

    #[test]
    fn test_currency_serde_uses_code() {
        let c: Currency = serde_yaml::from_str("GBP").unwrap();
        assert_eq!(c, Currency::GBP);
        assert_eq!(serde_yaml::to_string(&Currency::CAD).unwrap().trim(), "CAD");
    }
}
