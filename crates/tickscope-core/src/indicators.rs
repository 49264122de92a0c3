//! Technical indicators derived from a close-price sequence.
//!
//! Everything here is a pure function of its input. A value that cannot be
//! computed (not enough history, zero average loss in RSI) is `None`; no
//! function in this module returns an error or a placeholder number.

use serde::{Deserialize, Serialize};

use crate::PriceSeries;

pub const RSI_PERIOD: usize = 14;
pub const TREND_WINDOW: usize = 60;

/// Attribute names of [`IndicatorSet`], in display order.
pub const INDICATOR_FIELDS: [&str; 6] = [
    "last_close",
    "ma20",
    "ma50",
    "ma200",
    "rsi14",
    "trend_slope_60",
];

/// Indicators for one price series.
///
/// Fields are independent: a short series can still carry `last_close` and
/// `rsi14` while the longer moving averages are absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub last_close: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub rsi14: Option<f64>,
    /// Least-squares slope over the last 60 observations, in price units per
    /// observation (not per day unless the series is daily).
    pub trend_slope_60: Option<f64>,
}

impl IndicatorSet {
    /// Compute every indicator from raw closes. NaN and infinite closes are
    /// discarded first.
    pub fn from_closes(closes: &[f64]) -> Self {
        let closes = closes
            .iter()
            .copied()
            .filter(|close| close.is_finite())
            .collect::<Vec<_>>();

        Self {
            last_close: closes.last().copied(),
            ma20: simple_moving_average(&closes, 20),
            ma50: simple_moving_average(&closes, 50),
            ma200: simple_moving_average(&closes, 200),
            rsi14: latest_rsi(&closes, RSI_PERIOD),
            trend_slope_60: linear_slope(&closes, TREND_WINDOW),
        }
    }

    /// Look up an indicator by name; unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "last_close" => self.last_close,
            "ma20" => self.ma20,
            "ma50" => self.ma50,
            "ma200" => self.ma200,
            "rsi14" => self.rsi14,
            "trend_slope_60" => self.trend_slope_60,
            _ => None,
        }
    }

    /// The set as an ordered name → optional value mapping.
    pub fn fields(&self) -> Vec<(&'static str, Option<f64>)> {
        INDICATOR_FIELDS
            .iter()
            .map(|name| (*name, self.get(name)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute the indicator set for a series.
///
/// An empty series, or one without a single usable close, yields the
/// all-absent set.
pub fn compute(series: &PriceSeries) -> IndicatorSet {
    IndicatorSet::from_closes(&series.closes())
}

/// Mean of the trailing `period` values, or `None` with fewer than `period`.
pub fn simple_moving_average(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Rolling-mean RSI aligned with `closes`.
///
/// Entry `i` is computed from the `period` differences ending at close `i`,
/// so the first `period` entries are always `None`. An entry is also `None`
/// when its average loss is exactly zero.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return series;
    }

    let deltas = closes
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect::<Vec<_>>();
    let period_f = period as f64;

    for (offset, window) in deltas.windows(period).enumerate() {
        let (gain, loss) = window.iter().fold((0.0_f64, 0.0_f64), |(gain, loss), &delta| {
            if delta > 0.0 {
                (gain + delta, loss)
            } else {
                (gain, loss - delta)
            }
        });

        series[offset + period] = rsi_from_averages(gain / period_f, loss / period_f);
    }

    series
}

/// RSI at the most recent close.
///
/// `None` when there are fewer than `period + 1` closes or when the last
/// window has no losing move.
pub fn latest_rsi(closes: &[f64], period: usize) -> Option<f64> {
    rsi_series(closes, period).last().copied().flatten()
}

/// Slope of the least-squares line through the trailing `window` values,
/// using `0, 1, 2, ...` as the x axis.
pub fn linear_slope(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    let x_mean = (window - 1) as f64 / 2.0;
    // Offsetting by the first value keeps a flat window at exactly zero.
    let origin = tail[0];

    let (numerator, denominator) =
        tail.iter()
            .enumerate()
            .fold((0.0_f64, 0.0_f64), |(num, den), (index, &value)| {
                let dx = index as f64 - x_mean;
                (num + dx * (value - origin), den + dx * dx)
            });

    Some(numerator / denominator)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return None;
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
