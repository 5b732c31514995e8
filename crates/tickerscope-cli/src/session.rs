//! Session controller: drives the per-ticker pipeline.
//!
//! Tickers progress Pending → Fetched → Enriched → Rendered → Saved, or
//! Pending → Failed when the data source errors out or returns nothing.
//! Failures are logged and the loop moves on; only environment failures
//! (creating the output root) abort the whole run.

use std::fs;
use std::path::PathBuf;

use time::OffsetDateTime;
use tickerscope_core::{
    lookback, AnalysisRequest, AnalysisResult, DataSource, FetchRequest, IndicatorFrame,
};
use tracing::{info, warn};

use crate::error::CliError;
use crate::persist;
use crate::render;

/// Run-wide settings that are not part of the analysis request.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub author: String,
    pub output_root: PathBuf,
}

pub struct SessionController<'a> {
    source: &'a dyn DataSource,
    config: SessionConfig,
}

impl<'a> SessionController<'a> {
    pub fn new(source: &'a dyn DataSource, config: SessionConfig) -> Self {
        Self { source, config }
    }

    /// Process every ticker strictly sequentially, in input order.
    ///
    /// The returned [`AnalysisResult`] holds a frame for every ticker whose
    /// fetch succeeded, whether or not its artifacts could be written.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult, CliError> {
        fs::create_dir_all(&self.config.output_root)?;

        let fetch_start = lookback::fetch_start(
            request.start_date(),
            request.volatility_window(),
            request.rsi_period(),
        );

        let mut result = AnalysisResult::new();
        for ticker in request.tickers() {
            println!("\nProcessing {ticker}...");

            let fetch_request =
                match FetchRequest::new(ticker.clone(), fetch_start, request.end_date()) {
                    Ok(req) => req,
                    Err(error) => {
                        warn!(%ticker, %error, "skipping ticker: invalid fetch request");
                        continue;
                    }
                };

            let series = match self.source.fetch_daily(&fetch_request).await {
                Ok(series) if !series.is_empty() => series,
                Ok(_) => {
                    warn!(%ticker, "skipping ticker: data source returned no rows");
                    continue;
                }
                Err(error) => {
                    warn!(%ticker, %error, "skipping ticker: fetch failed");
                    continue;
                }
            };
            info!(%ticker, rows = series.len(), "fetched extended history");

            let frame = IndicatorFrame::enrich(
                &series,
                request.volatility_window(),
                request.rsi_period(),
            )
            .trim(request.start_date(), request.end_date());

            print_summary(&frame);

            if let Err(error) = self.write_artifacts(&frame, request) {
                // Fatal for this ticker's artifacts only; the frame is
                // already part of the result.
                warn!(%ticker, %error, "failed to write artifacts");
            }

            result.insert(ticker.clone(), frame);
        }

        Ok(result)
    }

    fn write_artifacts(
        &self,
        frame: &IndicatorFrame,
        request: &AnalysisRequest,
    ) -> Result<(), CliError> {
        let artifacts =
            persist::prepare_ticker_dir(&self.config.output_root, frame.symbol.as_str())?;

        render::render_chart(
            frame,
            &artifacts.chart,
            request.volatility_window(),
            request.rsi_period(),
            &self.config.author,
        )?;
        persist::write_csv(frame, &artifacts.data)?;
        persist::write_metadata(
            frame,
            &artifacts.metadata,
            &self.config.author,
            OffsetDateTime::now_utc(),
        )?;

        info!(
            ticker = %frame.symbol,
            directory = %artifacts.directory.display(),
            "saved chart, data, and metadata"
        );
        Ok(())
    }
}

fn print_summary(frame: &IndicatorFrame) {
    println!("Rows in requested range: {}", frame.len());

    if frame.is_empty() {
        return;
    }

    println!("Last closing prices:");
    let tail_start = frame.len().saturating_sub(5);
    for row in &frame.rows[tail_start..] {
        println!("  {}  {:.2}", row.date, row.close);
    }

    println!(
        "Current volatility: {}",
        frame
            .latest_volatility()
            .map_or_else(|| String::from("n/a"), |v| format!("{v:.4}"))
    );
    println!(
        "Current RSI: {}",
        frame
            .latest_rsi()
            .map_or_else(|| String::from("n/a"), |v| format!("{v:.2}"))
    );
}
