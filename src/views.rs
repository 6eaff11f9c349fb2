//! Dashboard views over the merged market table.
//!
//! Every view is a pure function of a [`MarketTable`] and its query parameters.
//! Views never mutate the table; an empty table or an empty selection produces an
//! empty frame rather than an error.

use polars::{
    frame::DataFrame,
    prelude::{Expr, LazyFrame, col, lit},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::CoinlensResult,
    io::{Frame, FrameName, ToJson},
    polars_ext::{any_of, year_expr},
};

pub mod battle;
pub mod chart;
pub mod fluctuations;
pub mod growth;
pub mod market_cap;
pub mod overview;
pub mod trade_count;
pub mod volume;

use chart::ChartSpec;

/// The derived frame of one view plus the charts drawn from it.
#[derive(Debug, Clone)]
pub struct ViewFrame {
    name: String,
    df: DataFrame,
    charts: Vec<ChartSpec>,
}

impl ViewFrame {
    pub(crate) fn new(name: &str, df: DataFrame, charts: Vec<ChartSpec>) -> Self {
        Self {
            name: name.to_string(),
            df,
            charts,
        }
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Charts and row data in one JSON document for a front end.
    pub fn to_chart_json(&self) -> CoinlensResult<Value> {
        Ok(json!({
            "name": self.name,
            "charts": self.charts,
            "data": self.to_json()?,
        }))
    }
}

impl Frame for ViewFrame {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl FrameName for ViewFrame {
    fn base_name(&self) -> String {
        self.name.clone()
    }
}

/// Inclusive range of calendar years.
///
/// A range whose start lies after its end selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    /// The range spanning every year present in `table`, if any.
    pub fn spanning(table: &MarketTable) -> CoinlensResult<Option<Self>> {
        let years = table.years()?;
        Ok(match (years.first(), years.last()) {
            (Some(&start), Some(&end)) => Some(Self::new(start, end)),
            _ => None,
        })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub(crate) fn as_expr(&self) -> Expr {
        let year = year_expr();
        year.clone()
            .gt_eq(lit(self.start))
            .and(year.lt_eq(lit(self.end)))
    }
}

/// How price development is expressed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum GrowthKind {
    /// Raw (mean) closing prices.
    #[default]
    Absolute,
    /// Percentage change relative to a baseline value.
    Percentage,
}

impl GrowthKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absolute => "Absolute Price",
            Self::Percentage => "Percentage Growth",
        }
    }
}

/// Bucket size for time-based aggregation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TimeScale {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl TimeScale {
    /// Length of the `Date` prefix identifying a bucket (`YYYY-MM-DD`, `YYYY-MM`, `YYYY`).
    pub fn prefix_len(&self) -> i64 {
        match self {
            Self::Daily => 10,
            Self::Monthly => 7,
            Self::Yearly => 4,
        }
    }
}

/// Rows of `symbols` within `years`.
pub(crate) fn selection<S: AsRef<str>>(
    table: &MarketTable,
    symbols: &[S],
    years: YearRange,
) -> LazyFrame {
    table
        .lazy()
        .filter(any_of(MarketCol::Symbol, symbols).and(years.as_expr()))
}

/// Rows of a single symbol.
pub(crate) fn symbol_rows(table: &MarketTable, symbol: &str) -> LazyFrame {
    table
        .lazy()
        .filter(col(MarketCol::Symbol).eq(lit(symbol.to_string())))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use polars::prelude::df;

    use crate::data::table::MarketTable;

    /// Two symbols over two years with round numbers.
    ///
    /// | Symbol | Date       | Open | Close | Volume | tradecount |
    /// |--------|------------|------|-------|--------|------------|
    /// | BTC    | 2021-01-01 | 90   | 100   | 10     | 5          |
    /// | BTC    | 2021-02-01 | 100  | 120   | 20     | 7          |
    /// | BTC    | 2022-01-01 | 120  | 200   | 30     | 9          |
    /// | ETH    | 2021-01-01 | 12   | 10    | 100    | 2          |
    /// | ETH    | 2022-01-01 | 10   | 20    | 300    | 4          |
    pub(crate) fn table() -> MarketTable {
        let df = df![
            "Unix" => &[1_609_459_200i64, 1_612_137_600, 1_640_995_200, 1_609_459_200, 1_640_995_200],
            "Date" => &["2021-01-01", "2021-02-01", "2022-01-01", "2021-01-01", "2022-01-01"],
            "Symbol" => &["BTC", "BTC", "BTC", "ETH", "ETH"],
            "Open" => &[90.0, 100.0, 120.0, 12.0, 10.0],
            "High" => &[110.0, 130.0, 210.0, 13.0, 21.0],
            "Low" => &[85.0, 95.0, 115.0, 9.0, 9.5],
            "Close" => &[100.0, 120.0, 200.0, 10.0, 20.0],
            "Volume" => &[10.0, 20.0, 30.0, 100.0, 300.0],
            "Volume USDT" => &[1_000.0, 2_400.0, 6_000.0, 1_000.0, 6_000.0],
            "tradecount" => &[5i64, 7, 9, 2, 4]
        ]
        .expect("Failed to create fixture DF");
        MarketTable::new(df).expect("fixture must be canonical")
    }
}
