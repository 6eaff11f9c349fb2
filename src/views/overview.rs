use chrono::NaiveDate;
use polars::prelude::{IdxSize, SortMultipleOptions, col, lit};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    polars_ext::ExprExt,
    views::{
        ViewFrame,
        chart::{ChartKind, ChartSpec},
        symbol_rows,
    },
};

/// Number of bars shown by the overview's recent price chart.
pub const RECENT_BARS: usize = 7;

/// Closing price of `symbol` on `date`.
///
/// If several bars fall on that day the last one wins. Returns `None` if the
/// symbol has no bar on that day.
pub fn price_on(table: &MarketTable, symbol: &str, date: NaiveDate) -> CoinlensResult<Option<f64>> {
    let day = date.format("%Y-%m-%d").to_string();

    let out = symbol_rows(table, symbol)
        .filter(col(MarketCol::Date).str_prefix(10).eq(lit(day)))
        .select([col(MarketCol::Close).last()])
        .collect()
        .map_err(|e| polars_err("Failed to look up price", e))?;

    let close = out
        .column(MarketCol::Close.as_str())
        .and_then(|c| c.f64().cloned())
        .map_err(|e| polars_err("Failed to read price", e))?;
    Ok(close.get(0))
}

/// The last `n` closes of `symbol` ordered by date, as a bar chart.
pub fn last_closes(table: &MarketTable, symbol: &str, n: usize) -> CoinlensResult<ViewFrame> {
    let df = symbol_rows(table, symbol)
        .sort([MarketCol::Date.as_str()], SortMultipleOptions::default())
        .select([col(MarketCol::Date), col(MarketCol::Close)])
        .tail(n as IdxSize)
        .collect()
        .map_err(|e| polars_err("Failed to collect recent closes", e))?;

    let chart = ChartSpec::new(
        ChartKind::Bar,
        format!("Last {n} Days Price of {symbol}"),
        MarketCol::Date.as_str(),
        MarketCol::Close.as_str(),
    )
    .with_color(MarketCol::Date.as_str());

    Ok(ViewFrame::new("recent_closes", df, vec![chart]))
}
