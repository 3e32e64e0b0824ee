//! The currency conversion workflow.

use crate::core::money::Money;
use crate::core::rates::RateSource;
use crate::store::TransactionStore;
use anyhow::{Context, Result, bail};
use serde::Serialize;

/// The converted view of a stored transaction, with the original response
/// field names of the service.
#[derive(Debug, Serialize, PartialEq)]
pub struct ConversionReport {
    pub uid: String,
    pub description: String,
    #[serde(rename = "transactionDate")]
    pub transaction_date: String,
    #[serde(rename = "originalValue")]
    pub original_value: String,
    #[serde(rename = "exchangeRate")]
    pub exchange_rate: String,
    #[serde(rename = "convertedValue")]
    pub converted_value: String,
}

/// Converts a stored transaction's amount into the `country`/`currency`
/// target using the most recent candidate rate from `rates`.
///
/// The rate lookup runs with no store lock held.
pub async fn convert_transaction(
    store: &TransactionStore,
    rates: &dyn RateSource,
    uid: &str,
    country: &str,
    currency: &str,
) -> Result<ConversionReport> {
    let entry = store.query(uid).await?;

    let pair = format!("{country}-{currency}");
    let candidates = rates.lookup(&pair, entry.transaction.date).await?;
    let Some(candidate) = candidates.first() else {
        bail!(
            "no conversion rate is available within 6 months of the purchase date; \
             the transaction cannot be converted to {currency}"
        );
    };

    let rate = Money::parse(&candidate.rate)
        .with_context(|| format!("Exchange rate {:?} is not a valid amount", candidate.rate))?;
    let converted = entry.transaction.amount.convert(&rate);

    Ok(ConversionReport {
        uid: entry.uid,
        description: entry.transaction.description,
        transaction_date: entry.transaction.date.to_string(),
        original_value: entry.transaction.amount.to_string(),
        exchange_rate: rate.to_string(),
        converted_value: converted.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::PurchaseDate;
    use crate::core::rates::RateQuote;
    use crate::core::transaction::Transaction;
    use async_trait::async_trait;

    struct FixedRateSource(Vec<RateQuote>);

    #[async_trait]
    impl RateSource for FixedRateSource {
        async fn lookup(&self, _pair: &str, _as_of: PurchaseDate) -> Result<Vec<RateQuote>> {
            Ok(self.0.clone())
        }
    }

    fn quote(rate: &str, record_date: &str) -> RateQuote {
        RateQuote {
            pair: "Mexico-Peso".to_string(),
            rate: rate.to_string(),
            record_date: record_date.to_string(),
        }
    }

    async fn registered_store(amount: &str) -> (TransactionStore, String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path().join("transactions.json"));
        let transaction = Transaction::new("Sample Transaction", "2023-06-30", amount).unwrap();
        let uid = store.register(transaction).await.unwrap();
        store.flush().await.unwrap();
        (store, uid, dir)
    }

    #[tokio::test]
    async fn test_convert_uses_first_candidate() {
        let (store, uid, _dir) = registered_store("99.99").await;
        let rates = FixedRateSource(vec![
            quote("17.077", "2023-06-30"),
            quote("17.733", "2023-03-31"),
        ]);

        let report = convert_transaction(&store, &rates, &uid, "Mexico", "Peso")
            .await
            .unwrap();

        assert_eq!(report.uid, uid);
        assert_eq!(report.description, "Sample Transaction");
        assert_eq!(report.transaction_date, "2023-06-30");
        assert_eq!(report.original_value, "99.9900");
        assert_eq!(report.exchange_rate, "17.0770");
        assert_eq!(report.converted_value, "1707.5300");
    }

    #[tokio::test]
    async fn test_convert_without_candidates_fails() {
        let (store, uid, _dir) = registered_store("99.99").await;
        let rates = FixedRateSource(Vec::new());

        let err = convert_transaction(&store, &rates, &uid, "Mexico", "Peso")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no conversion rate is available"));
    }

    #[tokio::test]
    async fn test_convert_unknown_transaction_fails() {
        let (store, _uid, _dir) = registered_store("99.99").await;
        let rates = FixedRateSource(vec![quote("17.077", "2023-06-30")]);

        let err = convert_transaction(&store, &rates, "no-such-id", "Mexico", "Peso")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("transaction not found"));
    }

    #[tokio::test]
    async fn test_convert_bad_rate_text_fails() {
        let (store, uid, _dir) = registered_store("99.99").await;
        let rates = FixedRateSource(vec![quote("17,077", "2023-06-30")]);

        let err = convert_transaction(&store, &rates, &uid, "Mexico", "Peso")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a valid amount"));
    }
}
