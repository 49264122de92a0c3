//! Market-data collaborator contract.
//!
//! The core never talks to a provider directly; it goes through a
//! [`MarketDataSource`], which the [`CachedFetcher`](crate::CachedFetcher)
//! wraps with its caches.
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | History | [`HistoryRequest`] | `Vec<PricePoint>` |
//! | Fundamentals (primary) | [`Symbol`] | [`Fundamentals`] |
//! | Fundamentals (fallback) | [`Symbol`] | [`Fundamentals`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Fundamentals, PricePoint, Symbol};

/// Boxed future returned by collaborator operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Collaborator error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, upstream 5xx or an open circuit.
    Unavailable,
    RateLimited,
    /// Unknown or delisted ticker.
    NotFound,
    /// Payload could not be decoded.
    InvalidResponse,
    /// The source has no implementation for this retrieval path.
    Unsupported,
    Internal,
}

/// Structured collaborator error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unsupported(operation: &str) -> Self {
        Self {
            kind: SourceErrorKind::Unsupported,
            message: format!("'{operation}' is not supported by this source"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Unsupported => "source.unsupported",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// History request. `period` and `interval` are provider tokens such as
/// `"1y"`/`"1d"` or `"1d"`/`"5m"`; they are forwarded as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: String,
    pub interval: String,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol,
            period: period.into(),
            interval: interval.into(),
        }
    }
}

/// Upstream market-data provider.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// caller of the fetcher.
pub trait MarketDataSource: Send + Sync {
    /// Short provider name used in log output.
    fn name(&self) -> &'static str;

    /// OHLCV history, oldest first.
    ///
    /// An unknown ticker may be reported either as an error or as an empty
    /// vector; the fetcher treats both the same way.
    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, Vec<PricePoint>>;

    /// Primary fundamentals retrieval path.
    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals>;

    /// Secondary fundamentals retrieval path, tried once when the primary fails.
    fn fundamentals_fallback<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Fundamentals> {
        let _ = symbol;
        Box::pin(async { Err(SourceError::unsupported("fundamentals_fallback")) })
    }
}
