use polars::prelude::{SortMultipleOptions, col, lit};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    polars_ext::ExprExt,
    views::{
        ViewFrame,
        chart::{ChartKind, ChartSpec},
    },
};

pub const MARKET_CAP: &str = "Market Cap";
pub const SHARE: &str = "Share";

/// Traded value proxy per symbol: the sum of `Close * Volume` over all bars.
///
/// `Share` is each symbol's percentage of the total.
pub fn market_share(table: &MarketTable) -> CoinlensResult<ViewFrame> {
    let cap = (col(MarketCol::Close) * col(MarketCol::Volume)).alias(MARKET_CAP);

    let df = table
        .lazy()
        .select([col(MarketCol::Symbol), cap])
        .group_by([col(MarketCol::Symbol)])
        .agg([col(MARKET_CAP).sum()])
        .sort([MarketCol::Symbol.as_str()], SortMultipleOptions::default())
        .with_column(
            (col(MARKET_CAP).safe_div(col(MARKET_CAP).sum()) * lit(100.0)).alias(SHARE),
        )
        .collect()
        .map_err(|e| polars_err("Failed to compute market share", e))?;

    let x = MarketCol::Symbol.as_str();
    let charts = vec![
        ChartSpec::new(ChartKind::Pie, "Market Share of All Coins", x, MARKET_CAP),
        ChartSpec::new(
            ChartKind::Bar,
            "Comparison of Market Cap Across Coins",
            x,
            MARKET_CAP,
        )
        .with_color(x),
    ];

    Ok(ViewFrame::new("market_cap", df, charts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::Frame, views::fixtures};

    #[test]
    fn test_market_share() {
        let view = market_share(&fixtures::table()).expect("market share");
        let df = view.as_df();

        // BTC: 100*10 + 120*20 + 200*30 = 9400, ETH: 10*100 + 20*300 = 7000
        let caps = df.column(MARKET_CAP).unwrap().f64().unwrap();
        assert_eq!(caps.into_iter().collect::<Vec<_>>(), vec![Some(9400.0), Some(7000.0)]);

        let shares = df.column(SHARE).unwrap().f64().unwrap();
        let btc = shares.get(0).unwrap();
        assert!((btc - 9400.0 / 16400.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_share_on_empty_table() {
        let view = market_share(&MarketTable::empty()).expect("market share");
        assert!(view.is_empty());
    }
}
