//! Behavior-driven tests for the session controller.
//!
//! These tests verify WHAT a whole run accomplishes: sequential per-ticker
//! processing, independent failure handling, and the on-disk artifact
//! layout.

use tempfile::tempdir;
use tickerscope_cli::session::{SessionConfig, SessionController};
use tickerscope_core::{
    AnalysisRequest, SourceError, Ticker, TradingDate, YahooAdapter,
};
use tickerscope_tests::{weekday_series, ScriptedSource};

fn date(input: &str) -> TradingDate {
    TradingDate::parse(input).expect("valid date")
}

fn request(tickers: &str, start: &str, end: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        Ticker::parse_list(tickers).expect("valid tickers"),
        date(start),
        date(end),
        5,
        5,
    )
    .expect("valid request")
}

fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + ((i * 3) % 9) as f64).collect()
}

// =============================================================================
// Session: Independent Per-Ticker Failure Handling
// =============================================================================

#[tokio::test]
async fn when_one_ticker_fails_to_fetch_the_rest_still_complete() {
    // Given: Two healthy tickers and one the provider cannot serve
    let source = ScriptedSource::new()
        .with_series(weekday_series("AAPL", "2022-12-01", &wavy_closes(60)))
        .with_failure("DOWN", SourceError::unavailable("provider outage"))
        .with_series(weekday_series("MSFT", "2022-12-01", &wavy_closes(60)));
    let output = tempdir().expect("tempdir");
    let session = SessionController::new(
        &source,
        SessionConfig {
            author: String::from("Test Author"),
            output_root: output.path().to_path_buf(),
        },
    );

    // When: The session processes all three
    let result = session
        .run(&request("AAPL,DOWN,MSFT", "2023-01-02", "2023-02-01"))
        .await
        .expect("run should not abort");

    // Then: The failed ticker is absent, the others are present
    assert_eq!(result.len(), 2);
    assert!(result.contains(&Ticker::parse("AAPL").expect("valid")));
    assert!(result.contains(&Ticker::parse("MSFT").expect("valid")));
    assert!(!result.contains(&Ticker::parse("DOWN").expect("valid")));

    // And: No partial directory exists for the failed ticker
    assert!(!output.path().join("DOWN").exists());
}

#[tokio::test]
async fn when_the_source_returns_zero_rows_the_ticker_is_skipped_without_aborting() {
    // Given: A ticker whose series exists but lies outside the fetch window
    let source = ScriptedSource::new()
        .with_series(weekday_series("GONE", "1990-01-01", &wavy_closes(10)))
        .with_series(weekday_series("AAPL", "2022-12-01", &wavy_closes(60)));
    let output = tempdir().expect("tempdir");
    let session = SessionController::new(
        &source,
        SessionConfig {
            author: String::from("Test Author"),
            output_root: output.path().to_path_buf(),
        },
    );

    // When: The session runs
    let result = session
        .run(&request("GONE,AAPL", "2023-01-02", "2023-02-01"))
        .await
        .expect("run should not abort");

    // Then: Only the ticker with data made it into the result
    assert_eq!(result.len(), 1);
    assert!(result.contains(&Ticker::parse("AAPL").expect("valid")));
}

// =============================================================================
// Session: Artifact Layout
// =============================================================================

#[tokio::test]
async fn a_successful_ticker_persists_chart_csv_and_metadata() {
    let source =
        ScriptedSource::new().with_series(weekday_series("AAPL", "2022-12-01", &wavy_closes(60)));
    let output = tempdir().expect("tempdir");
    let session = SessionController::new(
        &source,
        SessionConfig {
            author: String::from("Jane Doe"),
            output_root: output.path().to_path_buf(),
        },
    );

    let result = session
        .run(&request("AAPL", "2023-01-02", "2023-02-01"))
        .await
        .expect("run should not abort");
    assert_eq!(result.len(), 1);

    let ticker_dir = output.path().join("AAPL");
    assert!(ticker_dir.join("AAPL_analysis.png").is_file());
    assert!(ticker_dir.join("AAPL_data.csv").is_file());
    assert!(ticker_dir.join("metadata.txt").is_file());

    let metadata =
        std::fs::read_to_string(ticker_dir.join("metadata.txt")).expect("metadata readable");
    assert!(metadata.contains("Author: Jane Doe"));
    assert!(metadata.contains("Ticker: AAPL"));
    assert!(metadata.contains("Data Range: "));

    let csv = std::fs::read_to_string(ticker_dir.join("AAPL_data.csv")).expect("csv readable");
    let frame = result
        .get(&Ticker::parse("AAPL").expect("valid"))
        .expect("frame present");
    // Header plus one line per visible row.
    assert_eq!(csv.lines().count(), frame.len() + 1);
}

#[tokio::test]
async fn frames_are_trimmed_to_the_requested_range_before_persisting() {
    let source =
        ScriptedSource::new().with_series(weekday_series("AAPL", "2022-12-01", &wavy_closes(60)));
    let output = tempdir().expect("tempdir");
    let session = SessionController::new(
        &source,
        SessionConfig {
            author: String::from("Jane Doe"),
            output_root: output.path().to_path_buf(),
        },
    );

    let result = session
        .run(&request("AAPL", "2023-01-02", "2023-02-01"))
        .await
        .expect("run should not abort");

    let frame = result
        .get(&Ticker::parse("AAPL").expect("valid"))
        .expect("frame present");
    assert!(frame.first_date().expect("rows") >= date("2023-01-02"));
    assert!(frame.last_date().expect("rows") <= date("2023-02-01"));

    // The lookback buffer warmed the 5-day windows before the range began.
    let first = &frame.rows[0];
    assert!(first.volatility.is_some());
    assert!(first.rsi.is_some());
}

// =============================================================================
// Session: Offline End-to-End
// =============================================================================

#[tokio::test]
async fn offline_adapter_supports_a_complete_multi_ticker_run() {
    let adapter = YahooAdapter::offline();
    let output = tempdir().expect("tempdir");
    let session = SessionController::new(
        &adapter,
        SessionConfig {
            author: String::from("Offline User"),
            output_root: output.path().to_path_buf(),
        },
    );

    let result = session
        .run(&request("GOOGL,AAPL", "2023-01-02", "2023-03-01"))
        .await
        .expect("run should not abort");

    assert_eq!(result.len(), 2);
    for ticker in ["GOOGL", "AAPL"] {
        let dir = output.path().join(ticker);
        assert!(dir.join(format!("{ticker}_analysis.png")).is_file());
        assert!(dir.join(format!("{ticker}_data.csv")).is_file());
        assert!(dir.join("metadata.txt").is_file());
    }
}
