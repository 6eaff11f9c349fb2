use polars::prelude::{SortMultipleOptions, col};
use serde::{Deserialize, Serialize};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    views::{
        ViewFrame, YearRange,
        chart::{ChartKind, ChartSpec},
        selection,
    },
};

/// Name of the derived close-minus-open column.
pub const PRICE_CHANGE: &str = "Price Change";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadQuery {
    pub symbols: Vec<String>,
    pub years: YearRange,
}

impl SpreadQuery {
    pub fn new<I, S>(symbols: I, years: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            years,
        }
    }
}

/// Mean `Close - Open` per selected symbol, largest first.
pub fn open_close_spread(table: &MarketTable, query: &SpreadQuery) -> CoinlensResult<ViewFrame> {
    let change = (col(MarketCol::Close) - col(MarketCol::Open)).alias(PRICE_CHANGE);

    let df = selection(table, &query.symbols, query.years)
        .select([col(MarketCol::Symbol), change])
        .group_by([col(MarketCol::Symbol)])
        .agg([col(PRICE_CHANGE).mean()])
        .sort(
            [PRICE_CHANGE, MarketCol::Symbol.as_str()],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()
        .map_err(|e| polars_err("Failed to compute open/close spread", e))?;

    let chart = ChartSpec::new(
        ChartKind::Bar,
        "Open vs Close Price Difference Across Cryptocurrencies",
        MarketCol::Symbol.as_str(),
        PRICE_CHANGE,
    )
    .with_color(PRICE_CHANGE)
    .with_y_label("Price Difference (Close - Open)");

    Ok(ViewFrame::new("market_fluctuations", df, vec![chart]))
}
