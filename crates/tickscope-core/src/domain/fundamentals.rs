use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Value of a named attribute in a fundamentals snapshot or summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(value) => Some(value),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Attribute names of [`Fundamentals`], in display order.
pub const FUNDAMENTAL_FIELDS: [&str; 16] = [
    "shortName",
    "sector",
    "industry",
    "marketCap",
    "trailingPE",
    "forwardPE",
    "priceToBook",
    "dividendYield",
    "profitMargins",
    "operatingMargins",
    "revenueGrowth",
    "earningsGrowth",
    "beta",
    "fiftyTwoWeekHigh",
    "fiftyTwoWeekLow",
    "currency",
];

/// Company-level snapshot for one ticker.
///
/// Every attribute is optional; an unknown ticker or an unreachable provider
/// is represented by [`Fundamentals::unavailable`], not by an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub currency: Option<String>,
}

impl Fundamentals {
    /// Snapshot with every attribute absent.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::default()
    }

    /// Look up an attribute by its mapping name (`"marketCap"`, `"trailingPE"`, ...).
    ///
    /// Unknown names yield `None`, same as an absent value.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let number = |value: Option<f64>| value.map(FieldValue::Number);
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);

        match name {
            "shortName" => text(&self.short_name),
            "sector" => text(&self.sector),
            "industry" => text(&self.industry),
            "marketCap" => number(self.market_cap),
            "trailingPE" => number(self.trailing_pe),
            "forwardPE" => number(self.forward_pe),
            "priceToBook" => number(self.price_to_book),
            "dividendYield" => number(self.dividend_yield),
            "profitMargins" => number(self.profit_margins),
            "operatingMargins" => number(self.operating_margins),
            "revenueGrowth" => number(self.revenue_growth),
            "earningsGrowth" => number(self.earnings_growth),
            "beta" => number(self.beta),
            "fiftyTwoWeekHigh" => number(self.fifty_two_week_high),
            "fiftyTwoWeekLow" => number(self.fifty_two_week_low),
            "currency" => text(&self.currency),
            _ => None,
        }
    }

    /// The snapshot as an ordered name → optional value mapping.
    pub fn fields(&self) -> Vec<(&'static str, Option<FieldValue>)> {
        FUNDAMENTAL_FIELDS
            .iter()
            .map(|name| (*name, self.get(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_snapshot_has_every_field_absent() {
        let snapshot = Fundamentals::unavailable();
        assert!(snapshot.is_unavailable());
        assert!(snapshot.fields().iter().all(|(_, value)| value.is_none()));
        assert_eq!(snapshot.fields().len(), FUNDAMENTAL_FIELDS.len());
    }

    #[test]
    fn get_distinguishes_text_and_number_fields() {
        let snapshot = Fundamentals {
            short_name: Some(String::from("Apple Inc.")),
            trailing_pe: Some(0.0),
            ..Fundamentals::default()
        };

        assert_eq!(
            snapshot.get("shortName").as_ref().and_then(FieldValue::as_text),
            Some("Apple Inc.")
        );
        assert_eq!(snapshot.get("trailingPE"), Some(FieldValue::Number(0.0)));
        assert_eq!(snapshot.get("forwardPE"), None);
        assert_eq!(snapshot.get("notAField"), None);
        assert!(!snapshot.is_unavailable());
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let snapshot = Fundamentals {
            market_cap: Some(1.5e12),
            fifty_two_week_low: Some(120.0),
            ..Fundamentals::default()
        };
        let json = serde_json::to_value(&snapshot).expect("serializable");

        assert_eq!(json["marketCap"], serde_json::json!(1.5e12));
        assert_eq!(json["fiftyTwoWeekLow"], serde_json::json!(120.0));
        assert!(json["trailingPE"].is_null());
        assert!(json["shortName"].is_null());
    }
}
