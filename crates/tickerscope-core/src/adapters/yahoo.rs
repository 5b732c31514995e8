use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{DataSource, FetchRequest, ProviderId, SourceError};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{Bar, PriceSeries, TradingDate};

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const COOKIE_ENDPOINT: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";

/// Yahoo Finance adapter over the unofficial v8 chart endpoint.
///
/// In offline mode the adapter synthesizes a deterministic daily series
/// instead of touching the network, so the whole pipeline stays runnable
/// and testable without connectivity.
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    offline: bool,
    /// Session cookies are primed once per run; Yahoo occasionally rejects
    /// cookie-less chart requests.
    cookies_primed: AtomicBool,
}

impl YahooAdapter {
    pub fn online(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            offline: false,
            cookies_primed: AtomicBool::new(false),
        }
    }

    pub fn offline() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            offline: true,
            cookies_primed: AtomicBool::new(true),
        }
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch_daily<'a>(
        &'a self,
        req: &'a FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.offline {
                self.synthesize_series(req)
            } else {
                self.fetch_real(req).await
            }
        })
    }
}

impl YahooAdapter {
    async fn fetch_real(&self, req: &FetchRequest) -> Result<PriceSeries, SourceError> {
        self.prime_cookies().await;

        let endpoint = self.chart_endpoint(req);
        let response = self.execute_chart_request(&endpoint).await?;

        // A 401/429 usually means the session cookie went stale; re-prime
        // once and retry before giving up.
        let body = if response.status == 401 || response.status == 429 {
            self.cookies_primed.store(false, Ordering::SeqCst);
            self.prime_cookies().await;

            let retry = self.execute_chart_request(&endpoint).await?;
            if retry.status == 429 {
                return Err(SourceError::rate_limited(format!(
                    "yahoo returned status {} after cookie refresh",
                    retry.status
                )));
            }
            if !retry.is_success() {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {} after cookie refresh",
                    retry.status
                )));
            }
            retry.body
        } else if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        } else {
            response.body
        };

        parse_chart_body(&body, req)
    }

    fn chart_endpoint(&self, req: &FetchRequest) -> String {
        // period2 is exclusive upstream; push it one day past the requested
        // end so the final session is included.
        let period1 = req.start.unix_timestamp();
        let period2 = req
            .end
            .next_day()
            .map_or(req.end.unix_timestamp() + 86_400, TradingDate::unix_timestamp);

        format!(
            "{CHART_BASE}/{}?period1={period1}&period2={period2}&interval=1d&events=history",
            urlencoding::encode(req.symbol.as_str()),
        )
    }

    async fn execute_chart_request(
        &self,
        endpoint: &str,
    ) -> Result<crate::http_client::HttpResponse, SourceError> {
        let request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_timeout_ms(10_000);

        self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })
    }

    /// Best-effort cookie priming. The chart call reports its own failure,
    /// so a failed prime is not itself fatal.
    async fn prime_cookies(&self) {
        if self.cookies_primed.swap(true, Ordering::SeqCst) {
            return;
        }

        let request = HttpRequest::get(COOKIE_ENDPOINT)
            .with_header("referer", REFERER)
            .with_timeout_ms(10_000);
        let _ = self.http_client.execute(request).await;
    }

    /// Deterministic offline series: one bar per weekday in the requested
    /// range, on a sawtooth price path seeded by the symbol so distinct
    /// tickers chart differently but reruns are identical.
    fn synthesize_series(&self, req: &FetchRequest) -> Result<PriceSeries, SourceError> {
        let seed = symbol_seed(req.symbol.as_str());
        let mut bars = Vec::new();
        let mut day = Some(req.start);
        let mut index: u64 = 0;

        while let Some(date) = day {
            if date > req.end {
                break;
            }
            if !date.is_weekend() {
                let base = 90.0 + ((seed + index * 7) % 350) as f64 / 10.0;
                let bar = Bar::new(
                    date,
                    base,
                    base + 1.20,
                    base - 0.80,
                    base + 0.30,
                    Some(20_000 + index * 25),
                )
                .map_err(|error| SourceError::internal(error.to_string()))?;
                bars.push(bar);
                index += 1;
            }
            day = date.next_day();
        }

        Ok(PriceSeries::new(req.symbol.clone(), bars))
    }
}

fn parse_chart_body(body: &str, req: &FetchRequest) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        if !error.is_null() {
            return Err(SourceError::unavailable(format!(
                "yahoo chart API error: {error}"
            )));
        }
    }

    let result = chart_response
        .chart
        .result
        .first()
        .ok_or_else(|| SourceError::no_data("no chart data in response"))?;

    let timestamps = result
        .timestamp
        .as_ref()
        .ok_or_else(|| SourceError::no_data("chart response carries no timestamps"))?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| SourceError::no_data("chart response carries no quote block"))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = TradingDate::from_unix_timestamp(ts)
            .map_err(|error| SourceError::internal(format!("invalid timestamp {ts}: {error}")))?;

        // Rows with any missing OHLC value are provider gaps; skip them.
        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let volume = quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok());

            if let Ok(bar) = Bar::new(date, *open, *high, *low, *close, volume) {
                bars.push(bar);
            }
        }
    }

    Ok(PriceSeries::new(req.symbol.clone(), bars))
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Vec<YahooChartResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(byte as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::Ticker;
    use std::sync::Mutex;

    /// Transport returning a scripted sequence of responses.
    struct ScriptedHttpClient {
        responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let next = {
                let mut responses = self.responses.lock().expect("lock");
                if responses.is_empty() {
                    Ok(HttpResponse::ok_json("{}"))
                } else {
                    responses.remove(0)
                }
            };
            Box::pin(async move { next })
        }
    }

    fn fetch_request(symbol: &str, start: &str, end: &str) -> FetchRequest {
        FetchRequest::new(
            Ticker::parse(symbol).expect("ticker"),
            TradingDate::parse(start).expect("date"),
            TradingDate::parse(end).expect("date"),
        )
        .expect("request")
    }

    fn chart_json() -> String {
        // Two complete rows and one with a provider gap (null close).
        String::from(
            r#"{
              "chart": {
                "result": [{
                  "timestamp": [1672704000, 1672790400, 1672876800],
                  "indicators": {
                    "quote": [{
                      "open":   [124.0, 125.0, 126.0],
                      "high":   [126.0, 127.5, 128.0],
                      "low":    [123.0, 124.0, 125.0],
                      "close":  [125.5, 126.5, null],
                      "volume": [1000, 2000, 3000]
                    }]
                  }
                }],
                "error": null
              }
            }"#,
        )
    }

    #[tokio::test]
    async fn parses_chart_response_into_daily_bars() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json("{}")),
            Ok(HttpResponse::ok_json(chart_json())),
        ]);
        let adapter = YahooAdapter::online(Arc::new(client));
        let req = fetch_request("AAPL", "2023-01-01", "2023-01-10");

        let series = adapter.fetch_daily(&req).await.expect("series");

        // The gapped row is skipped.
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date.format_iso(), "2023-01-03");
        assert_eq!(series.bars[0].close, 125.5);
        assert_eq!(series.bars[1].volume, Some(2_000));
    }

    #[tokio::test]
    async fn surfaces_rate_limiting_after_failed_retry() {
        let rate_limited = HttpResponse {
            status: 429,
            body: String::new(),
        };
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json("{}")),
            Ok(rate_limited.clone()),
            Ok(HttpResponse::ok_json("{}")),
            Ok(rate_limited),
        ]);
        let adapter = YahooAdapter::online(Arc::new(client));
        let req = fetch_request("AAPL", "2023-01-01", "2023-01-10");

        let error = adapter.fetch_daily(&req).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn recovers_when_retry_succeeds() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json("{}")),
            Ok(HttpResponse {
                status: 401,
                body: String::new(),
            }),
            Ok(HttpResponse::ok_json("{}")),
            Ok(HttpResponse::ok_json(chart_json())),
        ]);
        let adapter = YahooAdapter::online(Arc::new(client));
        let req = fetch_request("AAPL", "2023-01-01", "2023-01-10");

        let series = adapter.fetch_daily(&req).await.expect("series");
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn empty_chart_result_reports_no_data() {
        let client = ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json("{}")),
            Ok(HttpResponse::ok_json(
                r#"{"chart": {"result": [], "error": null}}"#,
            )),
        ]);
        let adapter = YahooAdapter::online(Arc::new(client));
        let req = fetch_request("NXST", "2023-01-01", "2023-01-10");

        let error = adapter.fetch_daily(&req).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn offline_series_is_deterministic_and_skips_weekends() {
        let adapter = YahooAdapter::offline();
        let req = fetch_request("MSFT", "2023-01-02", "2023-01-15");

        let first = adapter.fetch_daily(&req).await.expect("series");
        let second = adapter.fetch_daily(&req).await.expect("series");

        assert_eq!(first, second);
        // 2023-01-02..15 spans two weekends: 10 weekdays.
        assert_eq!(first.len(), 10);
        assert!(first.bars.iter().all(|bar| !bar.date.is_weekend()));
    }

    #[tokio::test]
    async fn offline_series_differs_by_symbol() {
        let adapter = YahooAdapter::offline();
        let msft = adapter
            .fetch_daily(&fetch_request("MSFT", "2023-01-02", "2023-01-06"))
            .await
            .expect("series");
        let aapl = adapter
            .fetch_daily(&fetch_request("AAPL", "2023-01-02", "2023-01-06"))
            .await
            .expect("series");

        assert_ne!(msft.bars[0].close, aapl.bars[0].close);
    }
}
