use crate::{IndicatorFrame, Ticker, TradingDate, ValidationError};

/// Validated parameters for one analysis run.
///
/// Constructed once through [`AnalysisRequest::new`] and immutable
/// thereafter; interactive callers re-prompt until construction succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    tickers: Vec<Ticker>,
    start_date: TradingDate,
    end_date: TradingDate,
    volatility_window: usize,
    rsi_period: usize,
}

impl AnalysisRequest {
    pub fn new(
        tickers: Vec<Ticker>,
        start_date: TradingDate,
        end_date: TradingDate,
        volatility_window: usize,
        rsi_period: usize,
    ) -> Result<Self, ValidationError> {
        if start_date > end_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date.format_iso(),
                end: end_date.format_iso(),
            });
        }
        if volatility_window == 0 {
            return Err(ValidationError::ZeroWindow {
                field: "volatility window",
            });
        }
        if rsi_period == 0 {
            return Err(ValidationError::ZeroWindow {
                field: "RSI period",
            });
        }

        let mut unique: Vec<Ticker> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if !unique.contains(&ticker) {
                unique.push(ticker);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::EmptyTickerList);
        }

        Ok(Self {
            tickers: unique,
            start_date,
            end_date,
            volatility_window,
            rsi_period,
        })
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub const fn start_date(&self) -> TradingDate {
        self.start_date
    }

    pub const fn end_date(&self) -> TradingDate {
        self.end_date
    }

    pub const fn volatility_window(&self) -> usize {
        self.volatility_window
    }

    pub const fn rsi_period(&self) -> usize {
        self.rsi_period
    }
}

/// Per-run output: one enriched frame per ticker whose fetch succeeded,
/// in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    entries: Vec<(Ticker, IndicatorFrame)>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ticker's frame, replacing any earlier entry for the same
    /// symbol.
    pub fn insert(&mut self, ticker: Ticker, frame: IndicatorFrame) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == ticker) {
            entry.1 = frame;
        } else {
            self.entries.push((ticker, frame));
        }
    }

    pub fn get(&self, ticker: &Ticker) -> Option<&IndicatorFrame> {
        self.entries
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, frame)| frame)
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.get(ticker).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Ticker, IndicatorFrame)> {
        self.entries.iter()
    }
}
