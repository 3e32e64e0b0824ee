//! Fixed-point money values with a deterministic conversion algorithm.

use crate::core::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One whole currency unit in fraction ticks (4 decimal digits).
const SCALE: i64 = 10_000;
/// Largest whole part whose tick count still fits an `i64`. Keeping every
/// tick value in `i64` range means the `i128` product in [`Money::convert`]
/// cannot overflow for any pair of representable operands.
const MAX_WHOLE: i64 = (i64::MAX - (SCALE - 1)) / SCALE;
const FRACTION_DIGITS: usize = 4;
const DECIMAL_SEPARATOR: char = '.';
const DEFAULT_CURRENCY: &str = "$";

/// A non-negative monetary value stored as an integer whole part plus an
/// integer count of ten-thousandths, avoiding floating-point error.
///
/// The fractional part is always held in its normalized 4-digit form:
/// `"10.5"` parses to a fraction of 5000 ticks, and rendering always emits
/// all four digits (`"10.5000"`). Values are immutable; parsing and
/// conversion both produce new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    whole: i64,
    fraction: i64,
    currency: String,
}

impl Money {
    /// Builds a value from a whole part and a fraction in ticks
    /// (ten-thousandths, `0..10_000`).
    pub fn from_parts(whole: i64, fraction: i64) -> Self {
        debug_assert!((0..=MAX_WHOLE).contains(&whole));
        debug_assert!((0..SCALE).contains(&fraction));
        Money {
            whole,
            fraction,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Parses `"{whole}.{fraction}"` text into a value.
    ///
    /// The input must contain exactly one decimal separator and both parts
    /// must be non-negative integers. Fractional digits past the fourth are
    /// dropped, not rounded: `"12.12345"` keeps `1234`. The kept digits are
    /// interpreted positionally, so `"10.5"` means five tenths.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let mut parts = text.split(DECIMAL_SEPARATOR);
        let (whole_text, fraction_text) = match (parts.next(), parts.next(), parts.next()) {
            (Some(whole), Some(fraction), None) => (whole, fraction),
            _ => {
                return Err(ValidationError::InvalidAmount(format!(
                    "expected a single {DECIMAL_SEPARATOR:?} separator in {text:?}"
                )));
            }
        };

        let whole = parse_amount_part(whole_text)?;
        if whole > MAX_WHOLE {
            return Err(ValidationError::InvalidAmount(format!(
                "{whole_text:?} overflows the supported amount range"
            )));
        }
        let fraction_text: String = fraction_text.chars().take(FRACTION_DIGITS).collect();
        let fraction_digits = fraction_text.chars().count();
        let fraction = parse_amount_part(&fraction_text)?;

        Ok(Money {
            whole,
            fraction: fraction * 10_i64.pow((FRACTION_DIGITS - fraction_digits) as u32),
            currency: DEFAULT_CURRENCY.to_string(),
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The value collapsed to a single integer in fraction ticks, widened so
    /// the largest representable amount cannot overflow here.
    fn to_ticks(&self) -> i128 {
        i128::from(self.whole) * i128::from(SCALE) + i128::from(self.fraction)
    }

    /// Converts this amount with an exchange rate, both fixed-point.
    ///
    /// The operands are multiplied as tick integers (product scaled by
    /// 10^8), truncated back to a whole part, and the fractional remainder
    /// is collapsed to hundredths with a ceiling: any nonzero amount in the
    /// two dropped digits rounds the result up to the next hundredth. A
    /// ceiling that reaches a full unit carries into the whole part.
    ///
    /// The result carries the default currency symbol; the target currency
    /// is the caller's to assign.
    pub fn convert(&self, rate: &Money) -> Money {
        let base = i128::from(SCALE);
        let product = self.to_ticks() * rate.to_ticks();

        let mut whole = product / (base * base);
        let fraction_ticks = (product % (base * base)) / base;

        let mut hundredths = fraction_ticks / 100;
        if fraction_ticks % 100 > 0 {
            hundredths += 1;
        }
        if hundredths == 100 {
            whole += 1;
            hundredths = 0;
        }

        Money::from_parts(whole as i64, (hundredths * 100) as i64)
    }
}

fn parse_amount_part(text: &str) -> Result<i64, ValidationError> {
    let value: i64 = text
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(format!("could not parse {text:?}")))?;
    if value < 0 {
        return Err(ValidationError::InvalidAmount(format!(
            "{text:?} should be positive"
        )));
    }
    Ok(value)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{:04}",
            self.whole, DECIMAL_SEPARATOR, self.fraction
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Money::parse(&text).map_err(serde::de::Error::custom)
    }
}
