//! Exchange rates from the U.S. Treasury fiscal data service.

use crate::core::date::PurchaseDate;
use crate::core::rates::{RateQuote, RateSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const RATES_ENDPOINT: &str =
    "/services/api/fiscal_service/v1/accounting/od/rates_of_exchange";
const LOOKBACK_MONTHS: u32 = 6;

pub struct TreasuryRateSource {
    base_url: String,
}

impl TreasuryRateSource {
    pub fn new(base_url: &str) -> Self {
        TreasuryRateSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    data: Vec<RateQuote>,
}

#[async_trait]
impl RateSource for TreasuryRateSource {
    #[instrument(
        name = "TreasuryRateLookup",
        skip(self),
        fields(pair = %pair)
    )]
    async fn lookup(&self, pair: &str, as_of: PurchaseDate) -> Result<Vec<RateQuote>> {
        let window_start = as_of.lookback(LOOKBACK_MONTHS);
        let url = format!(
            "{}{}?fields=country_currency_desc,exchange_rate,record_date\
             &filter=country_currency_desc:in:({pair}),record_date:gte:{window_start},lte:{as_of}\
             &sort=-record_date",
            self.base_url, RATES_ENDPOINT
        );
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent("txbook/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to query exchange rates for pair: {pair}"))?;

        let rates = response
            .json::<RatesResponse>()
            .await
            .with_context(|| format!("Failed to parse exchange rate response for pair: {pair}"))?;

        debug!(candidates = rates.data.len(), "Received exchange rate candidates");
        Ok(rates.data)
    }
}
