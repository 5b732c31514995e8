use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 10;

/// Normalized equity ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::TickerTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(ValidationError::TickerInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::TickerInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// Parse a comma-separated ticker list, deduplicating while preserving
    /// the order symbols were supplied in. Empty segments are skipped, so
    /// trailing commas are harmless.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        let mut tickers: Vec<Self> = Vec::new();
        for segment in input.split(',') {
            if segment.trim().is_empty() {
                continue;
            }
            let ticker = Self::parse(segment)?;
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }

        if tickers.is_empty() {
            return Err(ValidationError::EmptyTickerList);
        }

        Ok(tickers)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_ticker() {
        let parsed = Ticker::parse(" aapl ").expect("ticker should parse");
        assert_eq!(parsed.as_str(), "AAPL");
    }

    #[test]
    fn rejects_invalid_start() {
        let err = Ticker::parse("1AAPL").expect_err("must fail");
        assert!(matches!(err, ValidationError::TickerInvalidStart { .. }));
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Ticker::parse("AAPL$").expect_err("must fail");
        assert!(matches!(err, ValidationError::TickerInvalidChar { .. }));
    }

    #[test]
    fn parses_list_preserving_order() {
        let tickers = Ticker::parse_list("googl, aapl,MSFT,").expect("list should parse");
        let names: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(names, ["GOOGL", "AAPL", "MSFT"]);
    }

    #[test]
    fn deduplicates_list() {
        let tickers = Ticker::parse_list("AAPL,aapl, AAPL ").expect("list should parse");
        assert_eq!(tickers.len(), 1);
    }

    #[test]
    fn rejects_empty_list() {
        let err = Ticker::parse_list(" , ,").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyTickerList));
    }
}
