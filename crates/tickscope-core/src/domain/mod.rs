//! # Domain Models
//!
//! Value types shared by the fetch layer, the indicator engine and the
//! summary assembler.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`UtcDateTime`] | UTC observation timestamp |
//! | [`PricePoint`] | One OHLCV observation, fields optional |
//! | [`PriceSeries`] | Time-ordered points for a `(symbol, period, interval)` request |
//! | [`Fundamentals`] | Company snapshot, every attribute optional |
//! | [`FieldValue`] | Number-or-text value used by the mapping views |
//!
//! Absence is always `None`. No type in this module uses NaN, zero or any
//! other sentinel to mean "unknown".

mod fundamentals;
mod price;
mod symbol;
mod timestamp;

pub use fundamentals::{FieldValue, Fundamentals, FUNDAMENTAL_FIELDS};
pub use price::{PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
