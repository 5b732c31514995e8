// Shared fixtures for tickerscope behavior tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tickerscope_core::data_source::{DataSource, FetchRequest, ProviderId, SourceError};
use tickerscope_core::{Bar, PriceSeries, Ticker, TradingDate};

/// Build a weekday-only series starting at `start` with the given closes.
/// Opens track the close and highs/lows pad it so bar validation holds.
pub fn weekday_series(symbol: &str, start: &str, closes: &[f64]) -> PriceSeries {
    let symbol = Ticker::parse(symbol).expect("fixture symbol is valid");
    let mut day = TradingDate::parse(start).expect("fixture date is valid");
    let mut bars = Vec::with_capacity(closes.len());

    for &close in closes {
        while day.is_weekend() {
            day = day.next_day().expect("calendar has a next day");
        }
        bars.push(
            Bar::new(day, close, close + 1.0, (close - 1.0).max(0.0), close, Some(1_000))
                .expect("fixture bar is valid"),
        );
        day = day.next_day().expect("calendar has a next day");
    }

    PriceSeries::new(symbol, bars)
}

/// Data source serving canned per-ticker outcomes; unknown tickers error.
pub struct ScriptedSource {
    outcomes: HashMap<String, Result<PriceSeries, SourceError>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.outcomes
            .insert(series.symbol.as_str().to_owned(), Ok(series));
        self
    }

    pub fn with_failure(mut self, symbol: &str, error: SourceError) -> Self {
        self.outcomes.insert(symbol.to_owned(), Err(error));
        self
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for ScriptedSource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch_daily<'a>(
        &'a self,
        req: &'a FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        let outcome = match self.outcomes.get(req.symbol.as_str()) {
            Some(Ok(series)) => {
                // Honor the requested window the way a provider would.
                let bars = series
                    .bars
                    .iter()
                    .filter(|bar| bar.date >= req.start && bar.date <= req.end)
                    .cloned()
                    .collect();
                Ok(PriceSeries::new(series.symbol.clone(), bars))
            }
            Some(Err(error)) => Err(error.clone()),
            None => Err(SourceError::no_data(format!(
                "no scripted outcome for {}",
                req.symbol
            ))),
        };
        Box::pin(async move { outcome })
    }
}
