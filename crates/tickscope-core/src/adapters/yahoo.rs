use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::data_source::{HistoryRequest, MarketDataSource, SourceError, SourceFuture};
use crate::http_client::{
    HttpAuth, HttpClient, HttpRequest, HttpResponse, NoopHttpClient, DEFAULT_TIMEOUT_MS,
};
use crate::{Fundamentals, PricePoint, Symbol, UtcDateTime};

const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

/// Env var holding a session cookie to send instead of the one Yahoo hands out.
pub const COOKIE_ENV: &str = "YAHOO_COOKIE";

// ============================================================================
// Cookie/crumb authentication
// ============================================================================

#[derive(Debug, Clone)]
struct CrumbState {
    crumb: String,
    fetched_at: Instant,
}

/// Caches the crumb token Yahoo requires on query endpoints.
///
/// The session cookie that goes with the crumb lives in the HTTP client's
/// cookie jar (or comes from `YAHOO_COOKIE`).
#[derive(Debug)]
pub struct YahooAuthManager {
    state: Mutex<Option<CrumbState>>,
    ttl: Duration,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            state: Mutex::new(None),
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl YahooAuthManager {
    fn cached(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|state| state.fetched_at.elapsed() < self.ttl)
            .map(|state| state.crumb.clone())
    }

    /// Current crumb, fetching a new cookie and crumb when missing or stale.
    async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        auth: &HttpAuth,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        let cookie_request = HttpRequest::get(COOKIE_URL)
            .with_header("referer", REFERER)
            .with_auth(auth)
            .with_timeout_ms(timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_auth(auth)
                .with_timeout_ms(timeout_ms);

            let response = match http_client.execute(request).await {
                Ok(response) if response.is_success() => response,
                Ok(response) if response.status == 429 => {
                    return Err(SourceError::rate_limited(
                        "Yahoo rate limited while fetching crumb",
                    ));
                }
                _ => continue,
            };

            let body = response.body.trim();
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::rate_limited(
                    "Yahoo rate limited while fetching crumb",
                ));
            }
            if is_plausible_crumb(body) {
                *self.lock() = Some(CrumbState {
                    crumb: body.to_owned(),
                    fetched_at: Instant::now(),
                });
                debug!("obtained Yahoo crumb");
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }

    /// Forget the cached crumb so the next call re-authenticates.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<CrumbState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_plausible_crumb(body: &str) -> bool {
    !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<')
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance market-data source.
///
/// Built with a real transport it calls the chart, quoteSummary and quote
/// endpoints. Built with [`Default`] (or any mock transport) it serves
/// deterministic synthetic data derived from the ticker, in which tickers
/// starting with `ZZ` are unknown.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    circuit_breaker: Arc<CircuitBreaker>,
    auth_manager: Arc<YahooAuthManager>,
    timeout_ms: u64,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(NoopHttpClient))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let auth = std::env::var(COOKIE_ENV)
            .ok()
            .filter(|cookie| !cookie.trim().is_empty())
            .map_or(HttpAuth::None, HttpAuth::Cookie);

        Self {
            use_real_api: !http_client.is_mock(),
            http_client,
            auth,
            circuit_breaker: Arc::new(CircuitBreaker::new(
                "yahoo",
                CircuitBreakerConfig::default(),
            )),
            auth_manager: Arc::new(YahooAuthManager::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: Arc<CircuitBreaker>) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn is_mock(&self) -> bool {
        !self.use_real_api
    }

    /// GET `url` with a crumb appended, re-authenticating once on 401/429.
    async fn fetch_body(&self, url: &str) -> Result<String, SourceError> {
        self.circuit_breaker.try_acquire()?;

        let mut response = self.send_with_crumb(url).await?;
        if response.status == 401 || response.status == 429 {
            debug!(status = response.status, "Yahoo rejected crumb; re-authenticating");
            self.auth_manager.invalidate();
            response = self.send_with_crumb(url).await?;
        }

        match response.status {
            200..=299 => {
                self.circuit_breaker.record_success();
                Ok(response.body)
            }
            // Unknown tickers come back as 404 with an error payload; the
            // upstream itself is healthy.
            404 => {
                self.circuit_breaker.record_success();
                Err(SourceError::not_found(describe_error_body(&response)))
            }
            429 => {
                self.circuit_breaker.record_failure();
                Err(SourceError::rate_limited("yahoo returned status 429"))
            }
            status => {
                self.circuit_breaker.record_failure();
                Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )))
            }
        }
    }

    async fn send_with_crumb(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let crumb = self
            .auth_manager
            .crumb(self.http_client.as_ref(), &self.auth, self.timeout_ms)
            .await
            .inspect_err(|_| self.circuit_breaker.record_failure())?;

        let request = HttpRequest::get(format!("{url}&crumb={}", urlencoding::encode(&crumb)))
            .with_header("referer", REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        self.http_client.execute(request).await.map_err(|e| {
            self.circuit_breaker.record_failure();
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })
    }

    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<Vec<PricePoint>, SourceError> {
        let url = format!(
            "{CHART_URL}/{}?range={}&interval={}&includePrePost=false&events=div%2Csplit",
            urlencoding::encode(req.symbol.as_str()),
            urlencoding::encode(&req.period),
            urlencoding::encode(&req.interval),
        );
        let body = self.fetch_body(&url).await?;
        parse_chart(&req.symbol, &body)
    }

    async fn fetch_real_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals, SourceError> {
        let url = format!(
            "{QUOTE_SUMMARY_URL}/{}?modules={QUOTE_SUMMARY_MODULES}",
            urlencoding::encode(symbol.as_str()),
        );
        let body = self.fetch_body(&url).await?;
        parse_quote_summary(symbol, &body)
    }

    async fn fetch_real_quote(&self, symbol: &Symbol) -> Result<Fundamentals, SourceError> {
        let url = format!(
            "{QUOTE_URL}?symbols={}",
            urlencoding::encode(symbol.as_str()),
        );
        let body = self.fetch_body(&url).await?;
        parse_quote(symbol, &body)
    }
}

impl MarketDataSource for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, Vec<PricePoint>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                mock_history(&req)
            }
        })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_fundamentals(symbol).await
            } else {
                mock_fundamentals(symbol, true)
            }
        })
    }

    fn fundamentals_fallback<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_quote(symbol).await
            } else {
                mock_fundamentals(symbol, false)
            }
        })
    }
}

// ============================================================================
// Payload parsing
// ============================================================================

/// Decode a v8 chart payload into time-ordered points.
///
/// Repeated or out-of-order timestamps (Yahoo repeats the live intraday bar)
/// are dropped so the result is strictly increasing.
pub fn parse_chart(symbol: &Symbol, body: &str) -> Result<Vec<PricePoint>, SourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse yahoo chart: {e}"))
    })?;

    if let Some(error) = envelope.chart.error {
        return Err(error.into_source_error(symbol));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |column: &[Option<f64>], index: usize| {
        column
            .get(index)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    };

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (index, seconds) in timestamps.into_iter().enumerate() {
        let ts = UtcDateTime::from_unix_timestamp(seconds)
            .map_err(|e| SourceError::invalid_response(e.to_string()))?;
        if points.last().is_some_and(|last| last.ts >= ts) {
            continue;
        }

        let volume = at(&quote.volume, index)
            .filter(|volume| *volume >= 0.0)
            .map(|volume| volume as u64);
        points.push(PricePoint::new(
            ts,
            at(&quote.open, index),
            at(&quote.high, index),
            at(&quote.low, index),
            at(&quote.close, index),
            volume,
        ));
    }

    Ok(points)
}

/// Decode a v10 quoteSummary payload (primary fundamentals path).
pub fn parse_quote_summary(symbol: &Symbol, body: &str) -> Result<Fundamentals, SourceError> {
    let envelope: QuoteSummaryEnvelope = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse yahoo quoteSummary: {e}"))
    })?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(error.into_source_error(symbol));
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no quoteSummary data for {symbol}")))?;

    let price = result.price.unwrap_or_default();
    let profile = result.summary_profile.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();

    Ok(Fundamentals {
        short_name: price.short_name,
        sector: profile.sector,
        industry: profile.industry,
        market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
        trailing_pe: raw(&detail.trailing_pe),
        forward_pe: raw(&detail.forward_pe).or_else(|| raw(&stats.forward_pe)),
        price_to_book: raw(&stats.price_to_book),
        dividend_yield: raw(&detail.dividend_yield),
        profit_margins: raw(&financial.profit_margins).or_else(|| raw(&stats.profit_margins)),
        operating_margins: raw(&financial.operating_margins),
        revenue_growth: raw(&financial.revenue_growth),
        earnings_growth: raw(&financial.earnings_growth),
        beta: raw(&detail.beta).or_else(|| raw(&stats.beta)),
        fifty_two_week_high: raw(&detail.fifty_two_week_high),
        fifty_two_week_low: raw(&detail.fifty_two_week_low),
        currency: price.currency.or(detail.currency),
    })
}

/// Decode a v7 quote payload (fallback fundamentals path). This endpoint has
/// no profile or financial-statement data.
pub fn parse_quote(symbol: &Symbol, body: &str) -> Result<Fundamentals, SourceError> {
    let envelope: QuoteEnvelope = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse yahoo quote: {e}"))
    })?;

    if let Some(error) = envelope.quote_response.error {
        return Err(error.into_source_error(symbol));
    }

    let quote = envelope
        .quote_response
        .result
        .into_iter()
        .find(|quote| quote.symbol.eq_ignore_ascii_case(symbol.as_str()))
        .ok_or_else(|| SourceError::not_found(format!("no quote data for {symbol}")))?;

    let finite = |value: Option<f64>| value.filter(|v| v.is_finite());

    Ok(Fundamentals {
        short_name: quote.short_name,
        market_cap: finite(quote.market_cap),
        trailing_pe: finite(quote.trailing_pe),
        forward_pe: finite(quote.forward_pe),
        price_to_book: finite(quote.price_to_book),
        // v7 reports dividend yield in percent; quoteSummary uses a fraction.
        dividend_yield: finite(quote.dividend_yield).map(|percent| percent / 100.0),
        beta: finite(quote.beta),
        fifty_two_week_high: finite(quote.fifty_two_week_high),
        fifty_two_week_low: finite(quote.fifty_two_week_low),
        currency: quote.currency,
        ..Fundamentals::default()
    })
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value
        .as_ref()
        .and_then(|value| value.raw)
        .filter(|value| value.is_finite())
}

fn describe_error_body(response: &HttpResponse) -> String {
    serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|value| {
            ["chart", "quoteSummary", "finance"]
                .iter()
                .find_map(|root| value.get(root)?.get("error")?.get("description")?.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("yahoo returned status {}", response.status))
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn into_source_error(self, symbol: &Symbol) -> SourceError {
        let description = self
            .description
            .unwrap_or_else(|| format!("yahoo API error for {symbol}"));
        match self.code.as_deref() {
            Some("Not Found") => SourceError::not_found(description),
            _ => SourceError::unavailable(description),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_profile: Option<ProfileModule>,
    summary_detail: Option<SummaryDetailModule>,
    default_key_statistics: Option<KeyStatisticsModule>,
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
    market_cap: Option<RawValue>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileModule {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SummaryDetailModule {
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
    beta: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct KeyStatisticsModule {
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    price_to_book: Option<RawValue>,
    profit_margins: Option<RawValue>,
    beta: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FinancialDataModule {
    profit_margins: Option<RawValue>,
    operating_margins: Option<RawValue>,
    revenue_growth: Option<RawValue>,
    earnings_growth: Option<RawValue>,
}

/// quoteSummary wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`, or `{}` when unknown.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<QuoteResult>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuoteResult {
    symbol: String,
    short_name: Option<String>,
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<f64>,
    price_to_book: Option<f64>,
    dividend_yield: Option<f64>,
    beta: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    currency: Option<String>,
}

// ============================================================================
// Offline data
// ============================================================================

const DAY_SECS: i64 = 86_400;
const SESSION_SECS: i64 = 23_400;
const MAX_MOCK_POINTS: i64 = 5_000;

fn is_mock_unknown(symbol: &Symbol) -> bool {
    symbol.as_str().starts_with("ZZ")
}

fn mock_history(req: &HistoryRequest) -> Result<Vec<PricePoint>, SourceError> {
    if is_mock_unknown(&req.symbol) {
        return Err(SourceError::not_found(format!(
            "no chart data for {}",
            req.symbol
        )));
    }

    let step = token_seconds(&req.interval).unwrap_or(DAY_SECS).max(60);
    let count = mock_point_count(&req.period, step);
    let seed = symbol_seed(&req.symbol);
    let base = 40.0 + (seed % 400) as f64;
    let drift = ((seed % 7) as f64 - 3.0) * 0.01 * (step as f64 / DAY_SECS as f64).min(1.0);
    let end = UtcDateTime::now().unix_timestamp() / step * step;

    (0..count)
        .map(|index| {
            let unix = (count - 1 - index)
                .checked_mul(step)
                .and_then(|offset| end.checked_sub(offset))
                .ok_or_else(|| SourceError::internal("mock timestamp out of range"))?;
            let ts = UtcDateTime::from_unix_timestamp(unix)
                .map_err(|e| SourceError::internal(e.to_string()))?;
            let wiggle = ((seed.wrapping_add(index as u64 * 7)) % 11) as f64 - 5.0;
            let close = (base * (1.0 + drift * index as f64 / 100.0) + wiggle * 0.25).max(0.01);
            let open = (close - wiggle * 0.05).max(0.01);

            Ok(PricePoint::new(
                ts,
                Some(open),
                Some(open.max(close) + 0.4),
                Some((open.min(close) - 0.4).max(0.01)),
                Some(close),
                Some(100_000 + (seed.wrapping_add(index as u64) % 50_000)),
            ))
        })
        .collect()
}

fn mock_fundamentals(symbol: &Symbol, primary: bool) -> Result<Fundamentals, SourceError> {
    if is_mock_unknown(symbol) {
        return Err(SourceError::not_found(format!(
            "no fundamentals for {symbol}"
        )));
    }

    let seed = symbol_seed(symbol);
    let high = 60.0 + (seed % 450) as f64;
    let mut snapshot = Fundamentals {
        short_name: Some(format!("{symbol} Holdings")),
        market_cap: Some(2.0e9 + (seed % 900_000) as f64 * 1.0e6),
        trailing_pe: Some(12.0 + (seed % 250) as f64 / 10.0),
        forward_pe: Some(11.0 + (seed % 200) as f64 / 10.0),
        price_to_book: Some(1.0 + (seed % 90) as f64 / 10.0),
        dividend_yield: Some((seed % 40) as f64 / 1_000.0),
        beta: Some(0.6 + (seed % 120) as f64 / 100.0),
        fifty_two_week_high: Some(high),
        fifty_two_week_low: Some(high * 0.7),
        currency: Some(String::from("USD")),
        ..Fundamentals::default()
    };

    if primary {
        snapshot.sector = Some(String::from("Technology"));
        snapshot.industry = Some(String::from("Software - Infrastructure"));
        snapshot.profit_margins = Some(0.05 + (seed % 30) as f64 / 100.0);
        snapshot.operating_margins = Some(0.08 + (seed % 30) as f64 / 100.0);
        snapshot.revenue_growth = Some((seed % 40) as f64 / 100.0 - 0.1);
        snapshot.earnings_growth = Some((seed % 60) as f64 / 100.0 - 0.2);
    }

    Ok(snapshot)
}

/// Rough number of bars Yahoo returns for a `period` sampled every `step` seconds.
fn mock_point_count(period: &str, step: i64) -> i64 {
    let span = match period.trim() {
        "ytd" => 182 * DAY_SECS,
        "max" => 10 * 365 * DAY_SECS,
        token => token_seconds(token).unwrap_or(365 * DAY_SECS),
    };
    let trading_days = (span / DAY_SECS * 5 / 7).max(1);

    let count = if step >= DAY_SECS {
        trading_days.saturating_mul(DAY_SECS) / step
    } else {
        trading_days.saturating_mul(SESSION_SECS) / step
    };
    count.clamp(1, MAX_MOCK_POINTS)
}

/// Seconds in a Yahoo period/interval token such as `5m`, `1h`, `1d`, `1wk`,
/// `3mo` or `2y`.
fn token_seconds(token: &str) -> Option<i64> {
    let token = token.trim().to_ascii_lowercase();
    let split = token.find(|ch: char| !ch.is_ascii_digit())?;
    let (amount, unit) = token.split_at(split);
    let amount = amount.parse::<i64>().ok()?;

    let unit_secs = match unit {
        "m" => 60,
        "h" => 3_600,
        "d" => DAY_SECS,
        "wk" => 7 * DAY_SECS,
        "mo" => 30 * DAY_SECS,
        "y" => 365 * DAY_SECS,
        _ => {
            warn!(token = %token, "unrecognized period/interval token");
            return None;
        }
    };
    amount.checked_mul(unit_secs)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
