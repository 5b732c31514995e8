//! Per-ticker artifact persistence.
//!
//! Layout under the output root:
//!
//! ```text
//! «output_root»/«TICKER»/«TICKER»_analysis.png
//! «output_root»/«TICKER»/«TICKER»_data.csv
//! «output_root»/«TICKER»/metadata.txt
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tickerscope_core::IndicatorFrame;

use crate::error::CliError;

const ANALYSIS_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Paths of the three artifacts written for one ticker.
#[derive(Debug, Clone)]
pub struct TickerArtifacts {
    pub directory: PathBuf,
    pub chart: PathBuf,
    pub data: PathBuf,
    pub metadata: PathBuf,
}

/// Create the per-ticker directory and derive the artifact paths.
pub fn prepare_ticker_dir(output_root: &Path, ticker: &str) -> Result<TickerArtifacts, CliError> {
    let directory = output_root.join(ticker);
    fs::create_dir_all(&directory)?;

    Ok(TickerArtifacts {
        chart: directory.join(format!("{ticker}_analysis.png")),
        data: directory.join(format!("{ticker}_data.csv")),
        metadata: directory.join("metadata.txt"),
        directory,
    })
}

/// Write the full frame as a date-indexed CSV. Undefined indicator values
/// serialize as empty cells.
pub fn write_csv(frame: &IndicatorFrame, path: &Path) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "log_return",
        "volatility",
        "rsi",
    ])?;

    for row in &frame.rows {
        writer.write_record([
            row.date.format_iso(),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.volume.map(|v| v.to_string()).unwrap_or_default(),
            optional_cell(row.log_return),
            optional_cell(row.volatility),
            optional_cell(row.rsi),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the `key: value` metadata record.
pub fn write_metadata(
    frame: &IndicatorFrame,
    path: &Path,
    author: &str,
    analysis_time: OffsetDateTime,
) -> Result<(), CliError> {
    let stamp = analysis_time
        .format(ANALYSIS_STAMP)
        .unwrap_or_else(|_| String::from("unknown"));

    let range = match (frame.first_date(), frame.last_date()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => String::from("empty"),
    };

    let mut file = fs::File::create(path)?;
    writeln!(file, "Author: {author}")?;
    writeln!(file, "Analysis Date: {stamp}")?;
    writeln!(file, "Ticker: {}", frame.symbol)?;
    writeln!(file, "Data Range: {range}")?;
    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
