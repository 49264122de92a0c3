//! Flat per-ticker rows joining fundamentals with daily and intraday indicators.

use serde::{Deserialize, Serialize};

use crate::{FieldValue, Fundamentals, IndicatorSet, Symbol};

/// Column names of [`SummaryRow`], in display order.
pub const SUMMARY_FIELDS: [&str; 16] = [
    "ticker",
    "name",
    "sector",
    "industry",
    "marketCap",
    "trailingPE",
    "forwardPE",
    "divYield",
    "52wHigh",
    "52wLow",
    "last_close_daily",
    "ma20",
    "ma50",
    "ma200",
    "rsi14",
    "last_price_intraday",
];

/// One comparison row for a ticker.
///
/// Every column except `ticker` is copied from a named source field and is
/// absent whenever its source is. Intraday moving averages, intraday RSI and
/// both trend slopes are not part of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub ticker: Symbol,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(rename = "divYield")]
    pub div_yield: Option<f64>,
    #[serde(rename = "52wHigh")]
    pub high_52w: Option<f64>,
    #[serde(rename = "52wLow")]
    pub low_52w: Option<f64>,
    pub last_close_daily: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub rsi14: Option<f64>,
    pub last_price_intraday: Option<f64>,
}

impl SummaryRow {
    /// Look up a column by name; unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let number = |value: Option<f64>| value.map(FieldValue::Number);
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);

        match name {
            "ticker" => Some(FieldValue::Text(self.ticker.to_string())),
            "name" => text(&self.name),
            "sector" => text(&self.sector),
            "industry" => text(&self.industry),
            "marketCap" => number(self.market_cap),
            "trailingPE" => number(self.trailing_pe),
            "forwardPE" => number(self.forward_pe),
            "divYield" => number(self.div_yield),
            "52wHigh" => number(self.high_52w),
            "52wLow" => number(self.low_52w),
            "last_close_daily" => number(self.last_close_daily),
            "ma20" => number(self.ma20),
            "ma50" => number(self.ma50),
            "ma200" => number(self.ma200),
            "rsi14" => number(self.rsi14),
            "last_price_intraday" => number(self.last_price_intraday),
            _ => None,
        }
    }

    /// The row as an ordered column → optional value mapping.
    pub fn fields(&self) -> Vec<(&'static str, Option<FieldValue>)> {
        SUMMARY_FIELDS
            .iter()
            .map(|name| (*name, self.get(name)))
            .collect()
    }
}

/// Assemble the summary row for `ticker`.
///
/// Pure field selection: nothing is defaulted, derived or substituted.
pub fn build_summary_row(
    ticker: &Symbol,
    fundamentals: &Fundamentals,
    tech_daily: &IndicatorSet,
    tech_intra: &IndicatorSet,
) -> SummaryRow {
    SummaryRow {
        ticker: ticker.clone(),
        name: fundamentals.short_name.clone(),
        sector: fundamentals.sector.clone(),
        industry: fundamentals.industry.clone(),
        market_cap: fundamentals.market_cap,
        trailing_pe: fundamentals.trailing_pe,
        forward_pe: fundamentals.forward_pe,
        div_yield: fundamentals.dividend_yield,
        high_52w: fundamentals.fifty_two_week_high,
        low_52w: fundamentals.fifty_two_week_low,
        last_close_daily: tech_daily.last_close,
        ma20: tech_daily.ma20,
        ma50: tech_daily.ma50,
        ma200: tech_daily.ma200,
        rsi14: tech_daily.rsi14,
        last_price_intraday: tech_intra.last_close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_from_unavailable_inputs_is_ticker_only() {
        let ticker = Symbol::parse("ZZZZ").expect("valid symbol");
        let row = build_summary_row(
            &ticker,
            &Fundamentals::unavailable(),
            &IndicatorSet::default(),
            &IndicatorSet::default(),
        );

        for (name, value) in row.fields() {
            if name == "ticker" {
                assert_eq!(value, Some(FieldValue::Text(String::from("ZZZZ"))));
            } else {
                assert_eq!(value, None, "column {name} should be absent");
            }
        }
    }

    #[test]
    fn serialized_row_uses_column_names() {
        let ticker = Symbol::parse("MSFT").expect("valid symbol");
        let fundamentals = Fundamentals {
            fifty_two_week_high: Some(468.35),
            dividend_yield: Some(0.0072),
            ..Fundamentals::default()
        };
        let row = build_summary_row(
            &ticker,
            &fundamentals,
            &IndicatorSet::default(),
            &IndicatorSet::default(),
        );
        let json = serde_json::to_value(&row).expect("serializable");

        assert_eq!(json["ticker"], "MSFT");
        assert_eq!(json["52wHigh"], serde_json::json!(468.35));
        assert_eq!(json["divYield"], serde_json::json!(0.0072));
        assert!(json["52wLow"].is_null());
        assert_eq!(json.as_object().map(|map| map.len()), Some(SUMMARY_FIELDS.len()));
    }
}
