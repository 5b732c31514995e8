use thiserror::Error;

/// Validation errors exposed by `tickerscope-core`.
///
/// Every variant maps to malformed user input or a malformed provider
/// payload; callers recover by re-prompting or skipping the offending row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },
    #[error("ticker list must contain at least one symbol")]
    EmptyTickerList,

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("'{value}' is not a valid positive integer")]
    InvalidPositiveInteger { value: String },
    #[error("{field} must be greater than zero")]
    ZeroWindow { field: &'static str },

    #[error("author name cannot be empty")]
    EmptyAuthor,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,
}
