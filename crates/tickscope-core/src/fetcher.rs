//! Cached access to the market-data collaborator.
//!
//! Two independent namespaces: price history keyed by
//! `(symbol, period, interval)` with a short TTL, and fundamentals keyed by
//! symbol with a long one. Upstream failures never reach the caller; they
//! degrade to an empty series or an all-absent snapshot, which is cached like
//! any other value so a failing ticker is not re-requested inside the TTL.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheMode, TtlCache};
use crate::data_source::{HistoryRequest, MarketDataSource};
use crate::indicators::{self, IndicatorSet};
use crate::summary::{build_summary_row, SummaryRow};
use crate::{Fundamentals, PriceSeries, Symbol};

pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_FUNDAMENTALS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Cache lifetimes for a [`CachedFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    pub history_ttl: Duration,
    pub fundamentals_ttl: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            history_ttl: DEFAULT_HISTORY_TTL,
            fundamentals_ttl: DEFAULT_FUNDAMENTALS_TTL,
        }
    }
}

/// Period/interval tokens used for the two halves of a summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryWindows {
    pub daily_period: String,
    pub daily_interval: String,
    pub intraday_period: String,
    pub intraday_interval: String,
}

impl Default for SummaryWindows {
    fn default() -> Self {
        Self {
            daily_period: String::from("1y"),
            daily_interval: String::from("1d"),
            intraday_period: String::from("1d"),
            intraday_interval: String::from("5m"),
        }
    }
}

/// Market-data collaborator wrapped in the history and fundamentals caches.
#[derive(Clone)]
pub struct CachedFetcher {
    source: Arc<dyn MarketDataSource>,
    history_cache: TtlCache<HistoryRequest, Arc<PriceSeries>>,
    fundamentals_cache: TtlCache<Symbol, Arc<Fundamentals>>,
}

impl CachedFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self::with_config(source, FetcherConfig::default())
    }

    pub fn with_config(source: Arc<dyn MarketDataSource>, config: FetcherConfig) -> Self {
        Self {
            source,
            history_cache: TtlCache::new(config.history_ttl),
            fundamentals_cache: TtlCache::new(config.fundamentals_ttl),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Price history for `(symbol, period, interval)`, served from cache while fresh.
    pub async fn history(&self, symbol: &Symbol, period: &str, interval: &str) -> Arc<PriceSeries> {
        self.history_with_mode(HistoryRequest::new(symbol.clone(), period, interval), CacheMode::Use)
            .await
    }

    pub async fn history_with_mode(&self, req: HistoryRequest, mode: CacheMode) -> Arc<PriceSeries> {
        if mode.reads() {
            if let Some(series) = self.history_cache.get(&req).await {
                debug!(
                    symbol = %req.symbol,
                    period = %req.period,
                    interval = %req.interval,
                    "history cache hit"
                );
                return series;
            }
        }

        debug!(
            symbol = %req.symbol,
            period = %req.period,
            interval = %req.interval,
            source = self.source.name(),
            "history cache miss; fetching"
        );
        let series = Arc::new(self.load_history(&req).await);

        if mode.writes() {
            self.history_cache.insert(req, Arc::clone(&series)).await;
        }
        series
    }

    /// Fundamentals snapshot for `symbol`, served from cache while fresh.
    pub async fn fundamentals(&self, symbol: &Symbol) -> Arc<Fundamentals> {
        self.fundamentals_with_mode(symbol, CacheMode::Use).await
    }

    pub async fn fundamentals_with_mode(&self, symbol: &Symbol, mode: CacheMode) -> Arc<Fundamentals> {
        if mode.reads() {
            if let Some(snapshot) = self.fundamentals_cache.get(symbol).await {
                debug!(symbol = %symbol, "fundamentals cache hit");
                return snapshot;
            }
        }

        debug!(
            symbol = %symbol,
            source = self.source.name(),
            "fundamentals cache miss; fetching"
        );
        let snapshot = Arc::new(self.load_fundamentals(symbol).await);

        if mode.writes() {
            self.fundamentals_cache
                .insert(symbol.clone(), Arc::clone(&snapshot))
                .await;
        }
        snapshot
    }

    /// Indicators for a freshly fetched (or cached) series. Not cached itself.
    pub async fn technicals(&self, symbol: &Symbol, period: &str, interval: &str) -> IndicatorSet {
        self.technicals_with_mode(HistoryRequest::new(symbol.clone(), period, interval), CacheMode::Use)
            .await
    }

    pub async fn technicals_with_mode(&self, req: HistoryRequest, mode: CacheMode) -> IndicatorSet {
        let series = self.history_with_mode(req, mode).await;
        indicators::compute(&series)
    }

    /// Fetch everything a summary row needs and assemble it.
    pub async fn summary_row(&self, symbol: &Symbol, windows: &SummaryWindows) -> SummaryRow {
        self.summary_row_with_mode(symbol, windows, CacheMode::Use).await
    }

    pub async fn summary_row_with_mode(
        &self,
        symbol: &Symbol,
        windows: &SummaryWindows,
        mode: CacheMode,
    ) -> SummaryRow {
        let fundamentals = self.fundamentals_with_mode(symbol, mode).await;
        let daily = self
            .technicals_with_mode(
                HistoryRequest::new(symbol.clone(), &windows.daily_period, &windows.daily_interval),
                mode,
            )
            .await;
        let intraday = self
            .technicals_with_mode(
                HistoryRequest::new(
                    symbol.clone(),
                    &windows.intraday_period,
                    &windows.intraday_interval,
                ),
                mode,
            )
            .await;

        build_summary_row(symbol, &fundamentals, &daily, &intraday)
    }

    /// Drop expired entries from both namespaces.
    pub async fn purge_expired(&self) {
        self.history_cache.clear_expired().await;
        self.fundamentals_cache.clear_expired().await;
    }

    pub async fn clear(&self) {
        self.history_cache.clear().await;
        self.fundamentals_cache.clear().await;
    }

    /// Number of stored entries as `(history, fundamentals)`, expired ones included.
    pub async fn cached_entries(&self) -> (usize, usize) {
        (
            self.history_cache.len().await,
            self.fundamentals_cache.len().await,
        )
    }

    async fn load_history(&self, req: &HistoryRequest) -> PriceSeries {
        let points = match self.source.history(req.clone()).await {
            Ok(points) => points,
            Err(error) => {
                warn!(
                    symbol = %req.symbol,
                    period = %req.period,
                    interval = %req.interval,
                    retryable = error.retryable(),
                    %error,
                    "history fetch failed; using empty series"
                );
                return PriceSeries::empty(req.symbol.clone(), &req.period, &req.interval);
            }
        };

        PriceSeries::new(req.symbol.clone(), &req.period, &req.interval, points).unwrap_or_else(
            |error| {
                warn!(
                    symbol = %req.symbol,
                    %error,
                    "source returned an unordered series; using empty series"
                );
                PriceSeries::empty(req.symbol.clone(), &req.period, &req.interval)
            },
        )
    }

    async fn load_fundamentals(&self, symbol: &Symbol) -> Fundamentals {
        let primary_error = match self.source.fundamentals(symbol).await {
            Ok(snapshot) => return snapshot,
            Err(error) => error,
        };

        warn!(
            symbol = %symbol,
            retryable = primary_error.retryable(),
            error = %primary_error,
            "primary fundamentals retrieval failed; trying fallback"
        );

        match self.source.fundamentals_fallback(symbol).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    symbol = %symbol,
                    retryable = error.retryable(),
                    %error,
                    "fallback fundamentals retrieval failed; snapshot unavailable"
                );
                Fundamentals::unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_minute_and_six_hour_ttls() {
        let config = FetcherConfig::default();
        assert_eq!(config.history_ttl, Duration::from_secs(60));
        assert_eq!(config.fundamentals_ttl, Duration::from_secs(21_600));
    }

    #[test]
    fn default_windows_cover_daily_and_intraday() {
        let windows = SummaryWindows::default();
        assert_eq!(
            (windows.daily_period.as_str(), windows.daily_interval.as_str()),
            ("1y", "1d")
        );
        assert_eq!(
            (
                windows.intraday_period.as_str(),
                windows.intraday_interval.as_str()
            ),
            ("1d", "5m")
        );
    }
}
