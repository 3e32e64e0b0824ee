//! Core business logic abstractions

pub mod date;
pub mod error;
pub mod money;
pub mod rates;
pub mod transaction;

// Re-export main types for cleaner imports
pub use date::PurchaseDate;
pub use error::ValidationError;
pub use money::Money;
pub use rates::{RateQuote, RateSource};
pub use transaction::{IdentifiedTransaction, Transaction};
