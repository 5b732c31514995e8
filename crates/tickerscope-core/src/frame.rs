use serde::{Deserialize, Serialize};

use crate::indicators::{log_returns, rolling_volatility, rsi};
use crate::{PriceSeries, Ticker, TradingDate};

/// One dated row of a [`IndicatorFrame`]: the raw bar plus the three derived
/// columns. `None` marks rows where an indicator is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
    pub log_return: Option<f64>,
    pub volatility: Option<f64>,
    pub rsi: Option<f64>,
}

/// A price series enriched with log returns, rolling volatility, and RSI.
///
/// Built once by [`IndicatorFrame::enrich`] and consumed read-only
/// afterward; [`IndicatorFrame::trim`] narrows to the requested date range
/// without recomputing any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub symbol: Ticker,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Compute all three indicator columns over the full series.
    ///
    /// A series shorter than the windows yields rows whose derived columns
    /// are entirely `None`; that is a reportable result, not an error.
    pub fn enrich(series: &PriceSeries, volatility_window: usize, rsi_period: usize) -> Self {
        let closes = series.closes();
        let returns = log_returns(&closes);
        let volatility = rolling_volatility(&returns, volatility_window);
        let strength = rsi(&closes, rsi_period);

        let rows = series
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                log_return: returns[i],
                volatility: volatility[i],
                rsi: strength[i],
            })
            .collect();

        Self {
            symbol: series.symbol.clone(),
            rows,
        }
    }

    /// Keep only rows within `[start, end]` inclusive.
    ///
    /// Indicator values are carried over untouched, so a row keeps the value
    /// computed over the extended (lookback-buffered) range. Trimming away
    /// every row yields an empty frame, not an error.
    pub fn trim(mut self, start: TradingDate, end: TradingDate) -> Self {
        self.rows.retain(|row| row.date >= start && row.date <= end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<TradingDate> {
        self.rows.first().map(|row| row.date)
    }

    pub fn last_date(&self) -> Option<TradingDate> {
        self.rows.last().map(|row| row.date)
    }

    /// Most recent volatility value, if the final row has one.
    pub fn latest_volatility(&self) -> Option<f64> {
        self.rows.last().and_then(|row| row.volatility)
    }

    /// Most recent RSI value, if the final row has one.
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rows.last().and_then(|row| row.rsi)
    }
}
