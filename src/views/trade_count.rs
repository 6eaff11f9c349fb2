use polars::prelude::{SortMultipleOptions, col};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    views::{
        ViewFrame,
        chart::{ChartKind, ChartSpec},
    },
};

/// Total number of trades per symbol over the whole table.
pub fn trade_counts(table: &MarketTable) -> CoinlensResult<ViewFrame> {
    let df = table
        .lazy()
        .group_by([col(MarketCol::Symbol)])
        .agg([col(MarketCol::TradeCount).sum()])
        .sort([MarketCol::Symbol.as_str()], SortMultipleOptions::default())
        .collect()
        .map_err(|e| polars_err("Failed to sum trade counts", e))?;

    let x = MarketCol::Symbol.as_str();
    let y = MarketCol::TradeCount.as_str();
    let charts = vec![
        ChartSpec::new(ChartKind::Bar, "Trade Count of Cryptocurrencies", x, y).with_color(x),
        ChartSpec::new(ChartKind::Pie, "Trade Count Distribution", x, y),
    ];

    Ok(ViewFrame::new("trade_count", df, charts))
}
