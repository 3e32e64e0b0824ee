use thiserror::Error;

use crate::core::transaction::MAX_DESCRIPTION_CHARS;

/// Validation failures raised while constructing transaction values.
///
/// These are recoverable, caller-facing errors: the input is rejected and
/// reported, nothing crashes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid purchase amount: {0}")]
    InvalidAmount(String),
    #[error("invalid date format: {0:?}")]
    InvalidDate(String),
    #[error("description exceeds {MAX_DESCRIPTION_CHARS} characters (got {0})")]
    InvalidDescription(usize),
}
