use std::sync::Arc;

use polars::prelude::{DataType, Field, PlSmallStr, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Canonical columns of the merged market table.
///
/// The declaration order is the column order of every table produced by the
/// ingestion pipeline. Column names follow the source CSV headers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
pub enum MarketCol {
    /// Unix epoch timestamp of the bar.
    #[strum(serialize = "Unix")]
    Timestamp,
    /// Calendar date, `YYYY-MM-DD[ HH:MM:SS]`.
    #[strum(serialize = "Date")]
    Date,
    /// Short uppercase ticker (e.g., `BTC`).
    #[strum(serialize = "Symbol")]
    Symbol,
    #[strum(serialize = "Open")]
    Open,
    #[strum(serialize = "High")]
    High,
    #[strum(serialize = "Low")]
    Low,
    #[strum(serialize = "Close")]
    Close,
    /// Traded volume in base asset units.
    #[strum(serialize = "Volume")]
    Volume,
    /// Traded volume in quote currency units.
    #[strum(serialize = "Volume USDT")]
    VolumeQuote,
    /// Number of trades in the bar.
    #[strum(serialize = "tradecount")]
    TradeCount,
}

impl From<MarketCol> for PlSmallStr {
    fn from(value: MarketCol) -> Self {
        value.as_str().into()
    }
}

impl From<&MarketCol> for PlSmallStr {
    fn from(value: &MarketCol) -> Self {
        value.as_str().into()
    }
}

impl MarketCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Self::Timestamp | Self::TradeCount => DataType::Int64,
            Self::Date | Self::Symbol => DataType::String,
            Self::Open
            | Self::High
            | Self::Low
            | Self::Close
            | Self::Volume
            | Self::VolumeQuote => DataType::Float64,
        }
    }

    /// Column names in canonical order.
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(|c| c.as_str()).collect()
    }

    /// The canonical schema shared by every merged table.
    pub fn schema() -> SchemaRef {
        let fields = Self::iter().map(|col| Field::new(col.into(), col.dtype()));
        Arc::new(Schema::from_iter(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_and_names() {
        assert_eq!(
            MarketCol::names(),
            vec![
                "Unix",
                "Date",
                "Symbol",
                "Open",
                "High",
                "Low",
                "Close",
                "Volume",
                "Volume USDT",
                "tradecount"
            ]
        );
        assert_eq!(MarketCol::COUNT, 10);
    }

    #[test]
    fn test_schema_dtypes() {
        let schema = MarketCol::schema();
        assert_eq!(schema.len(), MarketCol::COUNT);
        assert_eq!(schema.get("Unix"), Some(&DataType::Int64));
        assert_eq!(schema.get("Symbol"), Some(&DataType::String));
        assert_eq!(schema.get("Volume USDT"), Some(&DataType::Float64));
        assert_eq!(schema.get("tradecount"), Some(&DataType::Int64));
    }

    #[test]
    fn test_parse_from_header_name() {
        let col: MarketCol = "Volume USDT".parse().expect("failed to parse column");
        assert_eq!(col, MarketCol::VolumeQuote);
        assert!("Volume BTC".parse::<MarketCol>().is_err());
    }
}
