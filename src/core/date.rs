//! Calendar dates for purchase transactions.

use crate::core::error::ValidationError;
use chrono::{DateTime, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Rendering layout; also the snapshot file form.
const OUTPUT_LAYOUT: &str = "%Y-%m-%d";

/// Accepted input layouts, tried in order after RFC 3339.
const ACCEPTED_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// The calendar date a purchase happened on.
///
/// Input accepts RFC 3339 timestamps (any timezone offset) and the common
/// date-only layouts; output is always `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseDate(NaiveDate);

impl PurchaseDate {
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
            return Ok(PurchaseDate(timestamp.date_naive()));
        }
        for layout in ACCEPTED_LAYOUTS {
            if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
                return Ok(PurchaseDate(date));
            }
        }
        Err(ValidationError::InvalidDate(text.to_string()))
    }

    /// Start of a lookback window ending at this date.
    pub fn lookback(&self, months: u32) -> NaiveDate {
        self.0
            .checked_sub_months(Months::new(months))
            .unwrap_or(self.0)
    }
}

impl fmt::Display for PurchaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(OUTPUT_LAYOUT))
    }
}

impl Serialize for PurchaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PurchaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        PurchaseDate::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_layouts() {
        let expected = PurchaseDate(NaiveDate::from_ymd_opt(2023, 9, 26).unwrap());
        for text in ["26/09/2023", "26-09-2023", "2023-09-26", "2023/09/26"] {
            assert_eq!(PurchaseDate::parse(text).unwrap(), expected, "{text:?}");
        }
    }

    #[test]
    fn test_parse_rfc3339_variants() {
        let expected = PurchaseDate(NaiveDate::from_ymd_opt(2023, 9, 26).unwrap());
        assert_eq!(PurchaseDate::parse("2023-09-26T10:30:00Z").unwrap(), expected);
        assert_eq!(
            PurchaseDate::parse("2023-09-26T10:30:00+05:30").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_rejects_invalid_dates() {
        for text in ["01/14/2020", "32/10/2020", "2023-15-23", "yesterday", ""] {
            assert!(
                matches!(
                    PurchaseDate::parse(text),
                    Err(ValidationError::InvalidDate(_))
                ),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_always_iso() {
        assert_eq!(PurchaseDate::parse("26/09/2023").unwrap().to_string(), "2023-09-26");
        assert_eq!(
            PurchaseDate::parse("2023-09-26T10:30:00Z").unwrap().to_string(),
            "2023-09-26"
        );
    }

    #[test]
    fn test_lookback_window() {
        let date = PurchaseDate::parse("2023-06-30").unwrap();
        assert_eq!(
            date.lookback(6),
            NaiveDate::from_ymd_opt(2022, 12, 30).unwrap()
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let date = PurchaseDate::parse("2023-09-26").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2023-09-26\"");
        assert_eq!(serde_json::from_str::<PurchaseDate>(&json).unwrap(), date);
    }
}
