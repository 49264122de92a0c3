use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// One OHLCV observation.
///
/// Providers leave holes in their payloads (halted sessions, partial intraday
/// bars), so every measured field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl PricePoint {
    pub fn new(
        ts: UtcDateTime,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<u64>,
    ) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Point carrying only a close, the only field the indicators read.
    pub fn close_only(ts: UtcDateTime, close: f64) -> Self {
        Self::new(ts, None, None, None, Some(close), None)
    }
}

/// Price history for one `(symbol, period, interval)` request.
///
/// `period` and `interval` are the provider tokens the series was requested
/// with (`"1y"`/`"1d"`, `"1d"`/`"5m"`, ...); they are recorded, not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub period: String,
    pub interval: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting timestamps that are not strictly increasing.
    pub fn new(
        symbol: Symbol,
        period: impl Into<String>,
        interval: impl Into<String>,
        points: Vec<PricePoint>,
    ) -> Result<Self, ValidationError> {
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[1].ts <= pair[0].ts)
        {
            return Err(ValidationError::NonIncreasingTimestamp { index: index + 1 });
        }

        Ok(Self {
            symbol,
            period: period.into(),
            interval: interval.into(),
            points,
        })
    }

    pub fn empty(symbol: Symbol, period: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol,
            period: period.into(),
            interval: interval.into(),
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close prices in time order with missing and non-finite values dropped.
    pub fn closes(&self) -> Vec<f64> {
        self.points
            .iter()
            .filter_map(|point| point.close)
            .filter(|close| close.is_finite())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(seconds: i64) -> UtcDateTime {
        UtcDateTime::from_unix_timestamp(seconds).expect("valid timestamp")
    }

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn rejects_repeated_timestamp() {
        let points = vec![
            PricePoint::close_only(ts(10), 1.0),
            PricePoint::close_only(ts(20), 2.0),
            PricePoint::close_only(ts(20), 3.0),
        ];
        let err = PriceSeries::new(symbol(), "1y", "1d", points).expect_err("must fail");
        assert_eq!(err, ValidationError::NonIncreasingTimestamp { index: 2 });
    }

    #[test]
    fn closes_skip_missing_and_nan_values() {
        let points = vec![
            PricePoint::close_only(ts(1), 10.0),
            PricePoint::new(ts(2), Some(1.0), None, None, None, Some(5)),
            PricePoint::close_only(ts(3), f64::NAN),
            PricePoint::close_only(ts(4), 12.5),
        ];
        let series = PriceSeries::new(symbol(), "5d", "1d", points).expect("ordered");
        assert_eq!(series.len(), 4);
        assert_eq!(series.closes(), vec![10.0, 12.5]);
    }

    #[test]
    fn empty_series_has_no_closes() {
        let series = PriceSeries::empty(symbol(), "1d", "5m");
        assert!(series.is_empty());
        assert!(series.closes().is_empty());
        assert_eq!(series.interval, "5m");
    }
}
