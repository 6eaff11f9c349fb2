use polars::prelude::{Expr, SortMultipleOptions, col, lit};
use serde::{Deserialize, Serialize};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    polars_ext::ExprExt,
    views::{
        GrowthKind, TimeScale, ViewFrame, YearRange,
        chart::{ChartKind, ChartSpec},
        selection,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthQuery {
    pub symbol: String,
    pub years: YearRange,
    pub scale: TimeScale,
    pub kind: GrowthKind,
}

impl GrowthQuery {
    pub fn new(symbol: impl Into<String>, years: YearRange) -> Self {
        Self {
            symbol: symbol.into(),
            years,
            scale: TimeScale::default(),
            kind: GrowthKind::default(),
        }
    }

    pub fn with_scale(mut self, scale: TimeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_kind(mut self, kind: GrowthKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Mean close of one symbol per time bucket.
///
/// With [`GrowthKind::Percentage`] each bucket is expressed as the percentage
/// change against the first bucket in range.
pub fn growth(table: &MarketTable, query: &GrowthQuery) -> CoinlensResult<ViewFrame> {
    let bucket = col(MarketCol::Date)
        .str_prefix(query.scale.prefix_len())
        .alias(MarketCol::Date);

    let df = selection(table, &[query.symbol.as_str()], query.years)
        .group_by([bucket])
        .agg([col(MarketCol::Close).mean()])
        .sort([MarketCol::Date.as_str()], SortMultipleOptions::default())
        .with_column(growth_expr(query.kind))
        .collect()
        .map_err(|e| polars_err("Failed to compute growth", e))?;

    let chart = ChartSpec::new(
        ChartKind::Line,
        format!(
            "{} of {} from {} to {}",
            query.kind.label(),
            query.symbol,
            query.years.start,
            query.years.end
        ),
        MarketCol::Date.as_str(),
        MarketCol::Close.as_str(),
    )
    .with_y_label(query.kind.label())
    .with_markers();

    Ok(ViewFrame::new("growth", df, vec![chart]))
}

fn growth_expr(kind: GrowthKind) -> Expr {
    let close = col(MarketCol::Close);
    match kind {
        GrowthKind::Absolute => close,
        GrowthKind::Percentage => {
            let base = close.clone().first();
            ((close - base.clone()).safe_div(base) * lit(100.0)).alias(MarketCol::Close)
        }
    }
}
