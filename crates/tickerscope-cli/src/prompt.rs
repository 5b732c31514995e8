//! Interactive parameter collection.
//!
//! Validation is pure (parse functions returning `Result`); the retry loop
//! is caller-driven and re-asks until a value parses. Parameters supplied
//! on the command line are validated exactly once and never prompted for.

use std::io::{self, BufRead, Write};

use tickerscope_core::{AnalysisRequest, Ticker, TradingDate, ValidationError};

use crate::cli::Cli;
use crate::error::CliError;

/// Resolve the full [`AnalysisRequest`] from flags plus interactive input.
pub fn resolve_request(cli: &Cli) -> Result<AnalysisRequest, CliError> {
    let mut input = io::stdin().lock();
    resolve_request_from(cli, &mut input)
}

/// Author name from the flag or a prompt; never empty.
pub fn resolve_author(cli: &Cli) -> Result<String, CliError> {
    let mut input = io::stdin().lock();
    resolve_author_from(cli, &mut input)
}

fn resolve_request_from<R: BufRead>(cli: &Cli, input: &mut R) -> Result<AnalysisRequest, CliError> {
    let tickers = match &cli.tickers {
        Some(raw) => Ticker::parse_list(raw)?,
        None => prompt_until(
            input,
            "Enter stock tickers separated by comma (e.g. GOOGL,AAPL,MSFT): ",
            Ticker::parse_list,
        )?,
    };

    let cli_start = cli.start.as_deref().map(TradingDate::parse).transpose()?;
    let cli_end = cli.end.as_deref().map(TradingDate::parse).transpose()?;

    let (start, end) = loop {
        let start = match cli_start {
            Some(date) => date,
            None => prompt_until(input, "Enter start date (YYYY-MM-DD): ", TradingDate::parse)?,
        };
        let end = match cli_end {
            Some(date) => date,
            None => prompt_until(input, "Enter end date (YYYY-MM-DD): ", TradingDate::parse)?,
        };

        if start <= end {
            break (start, end);
        }
        if cli_start.is_some() && cli_end.is_some() {
            return Err(ValidationError::InvalidDateRange {
                start: start.format_iso(),
                end: end.format_iso(),
            }
            .into());
        }
        println!("Start date must be on or before end date.");
    };

    let volatility_window = resolve_window(
        input,
        cli.volatility_window,
        "volatility window",
        "Enter number of days for volatility calculation (e.g. 30): ",
    )?;
    let rsi_period = resolve_window(
        input,
        cli.rsi_period,
        "RSI period",
        "Enter number of days for RSI calculation (e.g. 14): ",
    )?;

    AnalysisRequest::new(tickers, start, end, volatility_window, rsi_period).map_err(CliError::from)
}

fn resolve_author_from<R: BufRead>(cli: &Cli, input: &mut R) -> Result<String, CliError> {
    match &cli.author {
        Some(author) => {
            let trimmed = author.trim();
            if trimmed.is_empty() {
                Err(ValidationError::EmptyAuthor.into())
            } else {
                Ok(trimmed.to_owned())
            }
        }
        None => prompt_until(input, "Please enter your name: ", parse_author),
    }
}

fn resolve_window<R: BufRead>(
    input: &mut R,
    flag: Option<usize>,
    field: &'static str,
    label: &str,
) -> Result<usize, CliError> {
    match flag {
        Some(0) => Err(ValidationError::ZeroWindow { field }.into()),
        Some(value) => Ok(value),
        None => prompt_until(input, label, parse_positive_integer),
    }
}

/// Positive integer parse for window sizes.
pub fn parse_positive_integer(input: &str) -> Result<usize, ValidationError> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ValidationError::InvalidPositiveInteger {
            value: input.trim().to_owned(),
        })
}

fn parse_author(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyAuthor)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Ask until `parse` accepts a line. Invalid input prints the validation
/// message and re-asks; a closed input stream is an I/O error, not a spin.
fn prompt_until<R: BufRead, T>(
    input: &mut R,
    label: &str,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<T, CliError> {
    loop {
        print!("{label}");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed while prompting",
            )
            .into());
        }

        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(error) => println!("{error}"),
        }
    }
}
