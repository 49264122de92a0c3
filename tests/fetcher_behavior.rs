//! Behavior tests for the cached fetcher.
//!
//! Time is paused so the real 60 second and 6 hour lifetimes can be crossed
//! with `tokio::time::advance` instead of waiting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tickscope_core::{
    CacheMode, CachedFetcher, FetcherConfig, Fundamentals, HistoryRequest, MarketDataSource,
    PricePoint, SourceError, SourceFuture, SummaryWindows, Symbol, UtcDateTime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    Fail,
    Empty,
    Unordered,
}

/// Scripted collaborator that counts every call it receives.
struct CountingSource {
    history: Outcome,
    primary: Outcome,
    fallback: Outcome,
    history_calls: AtomicUsize,
    primary_calls: AtomicUsize,
    fallback_calls: AtomicUsize,
}

impl CountingSource {
    fn new(history: Outcome, primary: Outcome, fallback: Outcome) -> Arc<Self> {
        Arc::new(Self {
            history,
            primary,
            fallback,
            history_calls: AtomicUsize::new(0),
            primary_calls: AtomicUsize::new(0),
            fallback_calls: AtomicUsize::new(0),
        })
    }

    fn healthy() -> Arc<Self> {
        Self::new(Outcome::Ok, Outcome::Ok, Outcome::Ok)
    }

    fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

fn closes(count: usize) -> Vec<PricePoint> {
    (0..count)
        .map(|index| {
            let ts = UtcDateTime::from_unix_timestamp(1_700_000_000 + index as i64 * 86_400)
                .expect("valid timestamp");
            PricePoint::close_only(ts, 100.0 + index as f64)
        })
        .collect()
}

impl MarketDataSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, Vec<PricePoint>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.history;
        Box::pin(async move {
            match outcome {
                Outcome::Ok if req.interval == "5m" => Ok(closes(3)),
                Outcome::Ok => Ok(closes(30)),
                Outcome::Empty => Ok(Vec::new()),
                Outcome::Unordered => {
                    let mut points = closes(5);
                    points.push(points[4].clone());
                    Ok(points)
                }
                Outcome::Fail => Err(SourceError::unavailable("connection reset")),
            }
        })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.primary;
        Box::pin(async move {
            match outcome {
                Outcome::Ok => Ok(Fundamentals {
                    short_name: Some(format!("{symbol} Inc.")),
                    sector: Some(String::from("Technology")),
                    market_cap: Some(1.0e12),
                    ..Fundamentals::default()
                }),
                Outcome::Empty | Outcome::Unordered => Ok(Fundamentals::unavailable()),
                Outcome::Fail => Err(SourceError::rate_limited("429")),
            }
        })
    }

    fn fundamentals_fallback<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.fallback;
        Box::pin(async move {
            match outcome {
                Outcome::Ok => Ok(Fundamentals {
                    short_name: Some(format!("{symbol} (quote)")),
                    market_cap: Some(9.0e11),
                    ..Fundamentals::default()
                }),
                Outcome::Empty | Outcome::Unordered => Ok(Fundamentals::unavailable()),
                Outcome::Fail => Err(SourceError::not_found("no quote")),
            }
        })
    }
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

// =============================================================================
// History cache
// =============================================================================

#[tokio::test(start_paused = true)]
async fn repeated_history_request_within_ttl_is_served_from_cache() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let first = fetcher.history(&aapl, "1y", "1d").await;
    tokio::time::advance(Duration::from_secs(59)).await;
    let second = fetcher.history(&aapl, "1y", "1d").await;

    assert_eq!(source.history_calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 30);
}

#[tokio::test(start_paused = true)]
async fn history_request_after_ttl_refetches_exactly_once() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let _ = fetcher.history(&aapl, "1y", "1d").await;
    tokio::time::advance(Duration::from_secs(60)).await;
    let _ = fetcher.history(&aapl, "1y", "1d").await;
    let _ = fetcher.history(&aapl, "1y", "1d").await;

    assert_eq!(source.history_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn history_cache_keys_on_period_and_interval() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let daily = fetcher.history(&aapl, "1y", "1d").await;
    let intraday = fetcher.history(&aapl, "1d", "5m").await;
    let _ = fetcher.history(&symbol("MSFT"), "1y", "1d").await;

    assert_eq!(source.history_calls(), 3);
    assert_eq!(daily.len(), 30);
    assert_eq!(intraday.len(), 3);
    assert_eq!(fetcher.cached_entries().await, (3, 0));
}

#[tokio::test(start_paused = true)]
async fn failed_history_degrades_to_cached_empty_series() {
    let source = CountingSource::new(Outcome::Fail, Outcome::Ok, Outcome::Ok);
    let fetcher = CachedFetcher::new(source.clone());
    let ghost = symbol("ZZZZ");

    let series = fetcher.history(&ghost, "1y", "1d").await;
    assert!(series.is_empty());
    assert_eq!(series.symbol, ghost);

    tokio::time::advance(Duration::from_secs(30)).await;
    let again = fetcher.history(&ghost, "1y", "1d").await;

    assert!(again.is_empty());
    assert_eq!(source.history_calls(), 1, "empty result is cached for the TTL");
}

#[tokio::test(start_paused = true)]
async fn empty_history_is_cached_like_any_other_result() {
    let source = CountingSource::new(Outcome::Empty, Outcome::Ok, Outcome::Ok);
    let fetcher = CachedFetcher::new(source.clone());

    let _ = fetcher.history(&symbol("DELIST"), "1y", "1d").await;
    let _ = fetcher.history(&symbol("DELIST"), "1y", "1d").await;

    assert_eq!(source.history_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_timestamps_from_source_degrade_to_cached_empty_series() {
    let source = CountingSource::new(Outcome::Unordered, Outcome::Ok, Outcome::Ok);
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let series = fetcher.history(&aapl, "1y", "1d").await;
    assert!(series.is_empty());
    assert_eq!(series.symbol, aapl);

    tokio::time::advance(Duration::from_secs(30)).await;
    let again = fetcher.history(&aapl, "1y", "1d").await;

    assert!(again.is_empty());
    assert_eq!(source.history_calls(), 1);
    assert_eq!(fetcher.cached_entries().await, (1, 0));
}

#[tokio::test(start_paused = true)]
async fn refresh_mode_refetches_and_replaces_entry() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");
    let req = HistoryRequest::new(aapl.clone(), "1y", "1d");

    let first = fetcher.history(&aapl, "1y", "1d").await;
    let refreshed = fetcher.history_with_mode(req, CacheMode::Refresh).await;
    let cached = fetcher.history(&aapl, "1y", "1d").await;

    assert_eq!(source.history_calls(), 2);
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert!(Arc::ptr_eq(&refreshed, &cached));
}

#[tokio::test(start_paused = true)]
async fn bypass_mode_leaves_cache_untouched() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let req = HistoryRequest::new(symbol("AAPL"), "1y", "1d");

    let _ = fetcher.history_with_mode(req.clone(), CacheMode::Bypass).await;
    let _ = fetcher.history_with_mode(req, CacheMode::Bypass).await;

    assert_eq!(source.history_calls(), 2);
    assert_eq!(fetcher.cached_entries().await, (0, 0));
}

#[tokio::test(start_paused = true)]
async fn zero_ttl_disables_caching() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::with_config(
        source.clone(),
        FetcherConfig {
            history_ttl: Duration::ZERO,
            fundamentals_ttl: Duration::ZERO,
        },
    );
    let aapl = symbol("AAPL");

    let _ = fetcher.history(&aapl, "1y", "1d").await;
    let _ = fetcher.history(&aapl, "1y", "1d").await;
    let _ = fetcher.fundamentals(&aapl).await;
    let _ = fetcher.fundamentals(&aapl).await;

    assert_eq!(source.history_calls(), 2);
    assert_eq!(source.primary_calls(), 2);
}

// =============================================================================
// Fundamentals cache and fallback
// =============================================================================

#[tokio::test(start_paused = true)]
async fn fundamentals_are_cached_for_six_hours() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let first = fetcher.fundamentals(&aapl).await;
    tokio::time::advance(Duration::from_secs(6 * 60 * 60 - 1)).await;
    let second = fetcher.fundamentals(&aapl).await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.primary_calls(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    let _ = fetcher.fundamentals(&aapl).await;
    assert_eq!(source.primary_calls(), 2);
    assert_eq!(source.fallback_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn fundamentals_fall_back_once_when_primary_fails() {
    let source = CountingSource::new(Outcome::Ok, Outcome::Fail, Outcome::Ok);
    let fetcher = CachedFetcher::new(source.clone());

    let snapshot = fetcher.fundamentals(&symbol("AAPL")).await;

    assert_eq!(snapshot.short_name.as_deref(), Some("AAPL (quote)"));
    assert_eq!(snapshot.sector, None);
    assert_eq!(source.primary_calls(), 1);
    assert_eq!(source.fallback_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn fundamentals_are_all_absent_when_both_paths_fail() {
    let source = CountingSource::new(Outcome::Ok, Outcome::Fail, Outcome::Fail);
    let fetcher = CachedFetcher::new(source.clone());
    let ghost = symbol("ZZZZ");

    let snapshot = fetcher.fundamentals(&ghost).await;
    assert!(snapshot.is_unavailable());
    assert!(snapshot.fields().iter().all(|(_, value)| value.is_none()));

    let _ = fetcher.fundamentals(&ghost).await;
    assert_eq!(source.primary_calls(), 1, "unavailable snapshot is cached");
    assert_eq!(source.fallback_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_but_empty_primary_does_not_trigger_fallback() {
    let source = CountingSource::new(Outcome::Ok, Outcome::Empty, Outcome::Ok);
    let fetcher = CachedFetcher::new(source.clone());

    let snapshot = fetcher.fundamentals(&symbol("AAPL")).await;

    assert!(snapshot.is_unavailable());
    assert_eq!(source.fallback_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn namespaces_expire_independently() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let _ = fetcher.history(&aapl, "1y", "1d").await;
    let _ = fetcher.fundamentals(&aapl).await;
    tokio::time::advance(Duration::from_secs(120)).await;
    fetcher.purge_expired().await;

    assert_eq!(fetcher.cached_entries().await, (0, 1));
}

// =============================================================================
// Technicals and summary rows
// =============================================================================

#[tokio::test(start_paused = true)]
async fn summary_row_combines_daily_intraday_and_fundamentals() {
    let source = CountingSource::healthy();
    let fetcher = CachedFetcher::new(source.clone());
    let aapl = symbol("AAPL");

    let row = fetcher.summary_row(&aapl, &SummaryWindows::default()).await;

    assert_eq!(row.ticker, aapl);
    assert_eq!(row.name.as_deref(), Some("AAPL Inc."));
    assert_eq!(row.last_close_daily, Some(129.0));
    assert_eq!(row.ma20, Some(119.5));
    assert_eq!(row.ma50, None);
    assert_eq!(row.rsi14, None);
    assert_eq!(row.last_price_intraday, Some(102.0));
    assert_eq!(source.history_calls(), 2);

    let _ = fetcher.summary_row(&aapl, &SummaryWindows::default()).await;
    assert_eq!(source.history_calls(), 2);
    assert_eq!(source.primary_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn summary_row_for_unknown_ticker_carries_only_the_ticker() {
    let source = CountingSource::new(Outcome::Fail, Outcome::Fail, Outcome::Fail);
    let fetcher = CachedFetcher::new(source);

    let row = fetcher
        .summary_row(&symbol("ZZZZ"), &SummaryWindows::default())
        .await;

    let present = row
        .fields()
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(present, ["ticker"]);
}
