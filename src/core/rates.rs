//! Exchange rate lookup abstractions.

use crate::core::date::PurchaseDate;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// One candidate exchange rate as reported by the fiscal data service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateQuote {
    #[serde(rename = "country_currency_desc")]
    pub pair: String,
    #[serde(rename = "exchange_rate")]
    pub rate: String,
    #[serde(rename = "record_date")]
    pub record_date: String,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Candidate rates for a `"{Country}-{Currency}"` pair, most recent
    /// first, covering a 6-month window ending at `as_of`. An empty list
    /// means no rate is available.
    async fn lookup(&self, pair: &str, as_of: PurchaseDate) -> Result<Vec<RateQuote>>;
}
