use std::sync::Arc;

use polars::{
    frame::DataFrame,
    prelude::{IntoLazy, LazyFrame, SchemaRef, SortMultipleOptions, col},
};
use strum::IntoEnumIterator;

use crate::{
    data::{
        bar::{Bar, bars_from_df},
        market_col::MarketCol,
    },
    error::{CoinlensResult, SystemError, polars_err},
    io::{Frame, FrameName},
    polars_ext::year_expr,
};

/// The canonical, read-only table of all ingested bars.
///
/// Cloning is cheap: the frame is shared behind an `Arc`. No method hands out
/// mutable access, so every query operates on a derived copy.
#[derive(Debug, Clone)]
pub struct MarketTable {
    df: Arc<DataFrame>,
}

impl Default for MarketTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl MarketTable {
    /// An empty table that still carries the canonical schema.
    pub fn empty() -> Self {
        Self {
            df: Arc::new(DataFrame::empty_with_schema(&MarketCol::schema())),
        }
    }

    /// Wraps a frame whose schema must equal the canonical schema exactly.
    pub(crate) fn new(df: DataFrame) -> CoinlensResult<Self> {
        let actual = df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.dtype().clone()))
            .collect::<Vec<_>>();
        let expected = MarketCol::iter()
            .map(|c| (c.as_str().to_string(), c.dtype()))
            .collect::<Vec<_>>();

        if actual != expected {
            return Err(SystemError::InvariantViolation(format!(
                "Market table schema mismatch: expected {expected:?}, got {actual:?}"
            ))
            .into());
        }
        Ok(Self { df: Arc::new(df) })
    }

    pub fn to_schema() -> SchemaRef {
        MarketCol::schema()
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// True for the valid "no data available" state.
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// A lazy query over a copy of the table.
    pub fn lazy(&self) -> LazyFrame {
        self.df.as_ref().clone().lazy()
    }

    pub fn bars(&self) -> CoinlensResult<Vec<Bar>> {
        bars_from_df(&self.df)
    }

    /// Distinct symbols, sorted ascending.
    pub fn symbols(&self) -> CoinlensResult<Vec<String>> {
        let out = self
            .lazy()
            .select([col(MarketCol::Symbol).unique()])
            .sort([MarketCol::Symbol.as_str()], SortMultipleOptions::default())
            .collect()
            .map_err(|e| polars_err("Failed to collect symbols", e))?;

        let symbols = out
            .column(MarketCol::Symbol.as_str())
            .and_then(|c| c.str().cloned())
            .map_err(|e| polars_err("Failed to read symbols", e))?;
        Ok(symbols.into_iter().flatten().map(str::to_string).collect())
    }

    /// Distinct calendar years, sorted ascending.
    pub fn years(&self) -> CoinlensResult<Vec<i32>> {
        let out = self
            .lazy()
            .select([year_expr().unique().alias("year")])
            .sort(["year"], SortMultipleOptions::default())
            .collect()
            .map_err(|e| polars_err("Failed to collect years", e))?;

        let years = out
            .column("year")
            .and_then(|c| c.i32().cloned())
            .map_err(|e| polars_err("Failed to read years", e))?;
        Ok(years.into_iter().flatten().collect())
    }
}

impl Frame for MarketTable {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl FrameName for MarketTable {
    fn base_name(&self) -> String {
        "market_table".to_string()
    }
}
