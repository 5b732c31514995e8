//! CLI argument definitions for tickerscope.
//!
//! Every analysis parameter may be passed as a flag; whatever is left out
//! is collected interactively with a retry-until-valid prompt loop, so the
//! binary works both scripted and hands-on.
//!
//! # Examples
//!
//! ```bash
//! # Fully scripted
//! tickerscope --tickers GOOGL,AAPL --start 2023-01-01 --end 2023-03-01 \
//!     --volatility-window 30 --rsi-period 14 --author "Jane Doe"
//!
//! # Prompt for everything, render from the offline data source
//! tickerscope --offline
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Daily equity analysis: log returns, rolling volatility, and RSI per
/// ticker, rendered to a chart and persisted alongside the data.
#[derive(Debug, Parser)]
#[command(
    name = "tickerscope",
    author,
    version,
    about = "Per-ticker indicator analysis over daily price history"
)]
pub struct Cli {
    /// Comma-separated ticker symbols (e.g. GOOGL,AAPL,MSFT).
    ///
    /// Prompted for when omitted.
    #[arg(long)]
    pub tickers: Option<String>,

    /// Analysis start date, YYYY-MM-DD. Prompted for when omitted.
    #[arg(long)]
    pub start: Option<String>,

    /// Analysis end date, YYYY-MM-DD. Prompted for when omitted.
    #[arg(long)]
    pub end: Option<String>,

    /// Rolling volatility window in trading days. Prompted for when omitted.
    #[arg(long)]
    pub volatility_window: Option<usize>,

    /// RSI averaging period in trading days. Prompted for when omitted.
    #[arg(long)]
    pub rsi_period: Option<usize>,

    /// Name stamped on charts and metadata. Prompted for when omitted.
    #[arg(long)]
    pub author: Option<String>,

    /// Root directory for per-ticker artifacts.
    #[arg(long, default_value = "stock_analysis_results")]
    pub output_dir: PathBuf,

    /// Use the deterministic offline data source instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}
