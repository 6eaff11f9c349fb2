use polars::prelude::{Expr, SortMultipleOptions, col, lit};
use serde::{Deserialize, Serialize};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    polars_ext::ExprExt,
    views::{
        GrowthKind, ViewFrame, YearRange,
        chart::{ChartKind, ChartSpec},
        selection,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleQuery {
    pub symbols: Vec<String>,
    pub years: YearRange,
    pub kind: GrowthKind,
    pub chart: ChartKind,
}

impl BattleQuery {
    pub fn new<I, S>(symbols: I, years: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            years,
            kind: GrowthKind::default(),
            chart: ChartKind::Bar,
        }
    }

    pub fn with_kind(mut self, kind: GrowthKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }
}

/// Mean close per selected symbol over the year range.
///
/// With [`GrowthKind::Percentage`] each mean is expressed as the percentage it
/// lies above the smallest mean of the selection.
pub fn compare(table: &MarketTable, query: &BattleQuery) -> CoinlensResult<ViewFrame> {
    let df = selection(table, &query.symbols, query.years)
        .group_by([col(MarketCol::Symbol)])
        .agg([col(MarketCol::Close).mean()])
        .sort([MarketCol::Symbol.as_str()], SortMultipleOptions::default())
        .with_column(relative_expr(query.kind))
        .collect()
        .map_err(|e| polars_err("Failed to compare symbols", e))?;

    let mut chart = ChartSpec::new(
        query.chart,
        "Comparison of Cryptocurrency Growth",
        MarketCol::Symbol.as_str(),
        MarketCol::Close.as_str(),
    )
    .with_y_label(query.kind.label());
    chart = match query.chart {
        ChartKind::Line => chart.with_markers(),
        ChartKind::Bar | ChartKind::Pie => chart.with_color(MarketCol::Symbol.as_str()),
    };

    Ok(ViewFrame::new("crypto_battle", df, vec![chart]))
}

fn relative_expr(kind: GrowthKind) -> Expr {
    let close = col(MarketCol::Close);
    match kind {
        GrowthKind::Absolute => close,
        GrowthKind::Percentage => {
            let base = close.clone().min();
            ((close - base.clone()).safe_div(base) * lit(100.0)).alias(MarketCol::Close)
        }
    }
}
