//! # Tickscope Core
//!
//! Technical indicators, cached market-data access and per-ticker summary
//! rows for equities.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo) |
//! | [`cache`] | TTL cache and cache modes |
//! | [`circuit_breaker`] | Circuit breaker for upstream calls |
//! | [`data_source`] | Market-data collaborator trait and errors |
//! | [`domain`] | Symbols, timestamps, price series, fundamentals |
//! | [`error`] | Validation errors |
//! | [`fetcher`] | Cached history and fundamentals retrieval |
//! | [`http_client`] | HTTP client abstraction |
//! | [`indicators`] | Moving averages, RSI and trend slope |
//! | [`summary`] | Summary row assembly |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickscope_core::{CachedFetcher, SummaryWindows, Symbol, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = CachedFetcher::new(Arc::new(YahooAdapter::default()));
//!     let symbol = Symbol::parse("AAPL")?;
//!
//!     let row = fetcher.summary_row(&symbol, &SummaryWindows::default()).await;
//!     println!("{:?}", row.ma20);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Cached Fetcher  │────▶│ Indicators /     │
//! │ (TTL caches)    │     │ Summary Rows     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Market Data     │────▶│ Circuit Breaker  │
//! │ Source (Yahoo)  │     │ HTTP Client      │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! Upstream failures never surface from the fetcher: they degrade to an
//! empty series or an all-absent fundamentals snapshot, and every indicator
//! or summary field the inputs cannot support is `None`.

pub mod adapters;
pub mod cache;
pub mod circuit_breaker;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod indicators;
pub mod summary;

// Adapter implementations
pub use adapters::{YahooAdapter, YahooAuthManager};

// Caching
pub use cache::{CacheMode, TtlCache};

// Circuit breaker
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

// Data source trait and types
pub use data_source::{HistoryRequest, MarketDataSource, SourceError, SourceErrorKind, SourceFuture};

// Domain models
pub use domain::{
    FieldValue, Fundamentals, PricePoint, PriceSeries, Symbol, UtcDateTime, FUNDAMENTAL_FIELDS,
};

// Error types
pub use error::ValidationError;

// Fetching
pub use fetcher::{
    CachedFetcher, FetcherConfig, SummaryWindows, DEFAULT_FUNDAMENTALS_TTL, DEFAULT_HISTORY_TTL,
};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Indicators and summaries
pub use indicators::{IndicatorSet, INDICATOR_FIELDS, RSI_PERIOD, TREND_WINDOW};
pub use summary::{build_summary_row, SummaryRow, SUMMARY_FIELDS};
