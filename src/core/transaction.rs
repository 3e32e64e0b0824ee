//! Validated purchase transaction values.

use crate::core::date::PurchaseDate;
use crate::core::error::ValidationError;
use crate::core::money::Money;
use serde::{Deserialize, Serialize};

pub const MAX_DESCRIPTION_CHARS: usize = 50;

/// An immutable purchase record. Construction goes through [`Transaction::new`],
/// which validates each field independently and reports the first failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub description: String,
    pub date: PurchaseDate,
    pub amount: Money,
}

impl Transaction {
    pub fn new(
        description: &str,
        date_text: &str,
        amount_text: &str,
    ) -> Result<Self, ValidationError> {
        let description = validate_description(description)?;
        let amount = Money::parse(amount_text)?;
        let date = PurchaseDate::parse(date_text)?;
        Ok(Transaction {
            description,
            date,
            amount,
        })
    }
}

fn validate_description(text: &str) -> Result<String, ValidationError> {
    let length = text.chars().count();
    if length > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::InvalidDescription(length));
    }
    Ok(text.to_string())
}

/// A transaction plus the unique id the store assigned at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub uid: String,
}

/// A 36-character token built from 16 random bytes, rendered as uppercase
/// hex in 8-4-4-4-12 groups. UUID-shaped, but carries no version or variant
/// bits; uniqueness is the store's job, not the format's.
pub fn generate_uid() -> String {
    let bytes: [u8; 16] = rand::random();
    let hex = |range: std::ops::Range<usize>| -> String {
        bytes[range].iter().map(|b| format!("{b:02X}")).collect()
    };
    format!(
        "{}-{}-{}-{}-{}",
        hex(0..4),
        hex(4..6),
        hex(6..8),
        hex(8..10),
        hex(10..16)
    )
}
