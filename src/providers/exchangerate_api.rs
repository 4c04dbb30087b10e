use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::RateTableProvider;
use crate::core::rates::RateTable;

const USER_AGENT: &str = concat!("fxconv/", env!("CARGO_PKG_VERSION"));

/// Latest USD rates from exchangerate-api.com's keyless v4 endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self) -> String {
        format!("{}/v4/latest/USD", self.base_url)
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
    base: Option<String>,
    date: Option<String>,
}

impl From<LatestRatesResponse> for RateTable {
    fn from(response: LatestRatesResponse) -> Self {
        let mut table = RateTable::new(response.rates);
        if let Some(base) = response.base {
            table = table.with_base(base);
        }
        if let Some(date) = response
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            table = table.with_date(date);
        }
        table
    }
}

#[async_trait]
impl RateTableProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateTable> {
        let url = self.latest_url();
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} fetching exchange rates",
                response.status()
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange rate response: {}", e))?;

        let table = RateTable::from(data);
        debug!(entries = table.len(), date = ?table.date(), "Received exchange rates");
        Ok(table)
    }
}
