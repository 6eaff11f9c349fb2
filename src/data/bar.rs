use chrono::NaiveDate;
use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};

use crate::{
    data::market_col::MarketCol,
    error::{CoinlensError, CoinlensResult, DataError, SystemError, polars_err},
};

/// One normalized OHLCV record of the merged market table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub date: String,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Base asset volume.
    pub volume: f64,
    /// Quote currency volume.
    pub volume_quote: f64,
    pub trade_count: i64,
}

impl Bar {
    /// Calendar day of the bar, parsed from the leading `YYYY-MM-DD` of `date`.
    pub fn day(&self) -> CoinlensResult<NaiveDate> {
        let prefix = self
            .date
            .get(..10)
            .ok_or_else(|| DataError::InvalidDate(self.date.clone()))?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
            .map_err(|_| DataError::InvalidDate(self.date.clone()).into())
    }
}

/// Reads every row of a canonical frame into [`Bar`] records.
pub(crate) fn bars_from_df(df: &DataFrame) -> CoinlensResult<Vec<Bar>> {
    let err = |e| polars_err("Failed to read canonical column", e);

    let ts = df.column(MarketCol::Timestamp.as_str()).map_err(err)?.i64().map_err(err)?;
    let date = df.column(MarketCol::Date.as_str()).map_err(err)?.str().map_err(err)?;
    let symbol = df.column(MarketCol::Symbol.as_str()).map_err(err)?.str().map_err(err)?;
    let open = df.column(MarketCol::Open.as_str()).map_err(err)?.f64().map_err(err)?;
    let high = df.column(MarketCol::High.as_str()).map_err(err)?.f64().map_err(err)?;
    let low = df.column(MarketCol::Low.as_str()).map_err(err)?.f64().map_err(err)?;
    let close = df.column(MarketCol::Close.as_str()).map_err(err)?.f64().map_err(err)?;
    let volume = df.column(MarketCol::Volume.as_str()).map_err(err)?.f64().map_err(err)?;
    let volume_quote = df
        .column(MarketCol::VolumeQuote.as_str())
        .map_err(err)?
        .f64()
        .map_err(err)?;
    let trade_count = df
        .column(MarketCol::TradeCount.as_str())
        .map_err(err)?
        .i64()
        .map_err(err)?;

    (0..df.height())
        .map(|i| {
            let missing = || -> CoinlensError {
                SystemError::InvariantViolation(format!("Null value in canonical row {i}")).into()
            };
            Ok(Bar {
                timestamp: ts.get(i).ok_or_else(missing)?,
                date: date.get(i).ok_or_else(missing)?.to_string(),
                symbol: symbol.get(i).ok_or_else(missing)?.to_string(),
                open: open.get(i).ok_or_else(missing)?,
                high: high.get(i).ok_or_else(missing)?,
                low: low.get(i).ok_or_else(missing)?,
                close: close.get(i).ok_or_else(missing)?,
                volume: volume.get(i).ok_or_else(missing)?,
                volume_quote: volume_quote.get(i).ok_or_else(missing)?,
                trade_count: trade_count.get(i).ok_or_else(missing)?,
            })
        })
        .collect()
}
