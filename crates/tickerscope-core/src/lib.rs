//! Core contracts for tickerscope.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The indicator engine (log returns, rolling volatility, RSI)
//! - Lookback buffer planning and range trimming
//! - Data source traits/adapters and the HTTP transport

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod frame;
pub mod http_client;
pub mod indicators;
pub mod lookback;
pub mod request;

pub use adapters::YahooAdapter;
pub use data_source::{DataSource, FetchRequest, ProviderId, SourceError, SourceErrorKind};
pub use domain::{Bar, PriceSeries, Ticker, TradingDate};
pub use error::ValidationError;
pub use frame::{IndicatorFrame, IndicatorRow};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use request::{AnalysisRequest, AnalysisResult};
